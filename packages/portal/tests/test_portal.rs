use folio_common::ManualClock;
use folio_model::{Asset, AssetType, Chapter, Page, Project};
use folio_portal::{html, HtmlOptions, Library, Resolution};

fn library_fixture() -> (Vec<Project>, Vec<Asset>) {
    let clock = ManualClock::default();

    let mut published = Project::with_id("pub", "The Crimson Cipher", &clock).unwrap();
    published.is_published = true;
    published.description = "A sci-fi thriller.".into();
    let mut chapter = Chapter::with_id("c1", "The Silent Signal", &clock).unwrap();
    chapter.pages.push(
        Page::with_id("p1", "First Encounter", &clock)
            .unwrap()
            .with_content("Rain. [[asset:kael:Kael]] waited."),
    );
    chapter
        .pages
        .push(Page::with_id("p2", "Second", &clock).unwrap().with_content("[[asset:mira:Mira]] left."));
    published.chapters.push(chapter);

    let draft = Project::with_id("draft", "Work in Progress", &clock).unwrap();

    let assets = vec![Asset::with_id("kael", "Kael", AssetType::Character, &clock)
        .unwrap()
        .with_description("A grizzled cyber-detective.")];
    (vec![published, draft], assets)
}

#[test]
fn test_publication_gates_reading() {
    let (projects, assets) = library_fixture();
    let library = Library::new(&projects, &assets);

    assert!(matches!(library.resolve("pub"), Resolution::Found(_)));
    assert!(library.resolve("draft").is_not_found());

    let listing = library.listing();
    assert_eq!(listing.len(), 1);
    assert_eq!(listing[0].id, "pub");
}

#[test]
fn test_reading_a_published_project() {
    let (projects, assets) = library_fixture();
    let library = Library::new(&projects, &assets);
    let mut view = library.resolve("pub").into_view().unwrap();

    assert_eq!(view.active_page().unwrap().title, "First Encounter");

    let detail = view.open_asset("kael");
    let detail = detail.detail().unwrap();
    assert_eq!(detail.type_label(), "character");
    assert_eq!(detail.description(), "A grizzled cyber-detective.");

    view.select_page("p2").unwrap();
    let page = html::render_reading_page(&view, HtmlOptions::default());
    assert!(page.contains("<li class=\"active\" data-page-id=\"p2\">Second</li>"));
    assert!(page.contains(
        "<button class=\"asset-mention asset-missing\" data-asset-id=\"mira\">Mira</button> left."
    ));

    let dangling = view.dangling_references();
    assert_eq!(dangling.len(), 1);
    assert_eq!(dangling[0].asset_id, "mira");
    assert_eq!(dangling[0].page_id, "p2");
}

#[test]
fn test_not_found_page_links_back() {
    let (projects, assets) = library_fixture();
    let library = Library::new(&projects, &assets);

    let Resolution::NotFound(view) = library.resolve("draft") else {
        panic!("draft must not resolve");
    };
    let page = html::render_not_found(&view, HtmlOptions::default());
    assert!(page.contains("Project not found or not published."));
    assert!(page.contains("<a href=\"/\">Return to library</a>"));
}

#[test]
fn test_listing_serializes_for_hosts() {
    let (projects, assets) = library_fixture();
    let library = Library::new(&projects, &assets);

    let json = serde_json::to_value(library.listing()).unwrap();
    assert_eq!(
        json,
        serde_json::json!([{
            "id": "pub",
            "title": "The Crimson Cipher",
            "description": "A sci-fi thriller."
        }])
    );
}
