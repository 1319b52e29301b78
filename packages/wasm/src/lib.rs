use folio_model::{selection, Asset, Project};
use folio_portal::{html, HtmlOptions, Library, Resolution};
use folio_references::{decode, encode, Renderer, Segment};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

fn parse_assets(assets_json: &str) -> Result<Vec<Asset>, JsValue> {
    serde_json::from_str(assets_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid assets: {}", e)))
}

/// Split page content into text and reference segments, as JSON
#[wasm_bindgen(js_name = decodeReferences)]
pub fn decode_references_js(content: &str) -> Result<String, JsValue> {
    let segments: Vec<Segment<'_>> = decode(content).collect();
    serde_json::to_string(&segments)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// Build the token that mentions an asset
#[wasm_bindgen(js_name = encodeReference)]
pub fn encode_reference_js(id: &str, name: &str) -> Result<String, JsValue> {
    encode(id, name).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Byte index of a UTF-16 code unit offset, if it falls between characters
fn utf16_to_byte(content: &str, offset: usize) -> Option<usize> {
    let mut units = 0;
    for (idx, ch) in content.char_indices() {
        if units == offset {
            return Some(idx);
        }
        if units > offset {
            return None;
        }
        units += ch.len_utf16();
    }
    (units == offset).then_some(content.len())
}

fn byte_offset(content: &str, offset: usize) -> Result<usize, JsValue> {
    utf16_to_byte(content, offset)
        .ok_or_else(|| JsValue::from_str(&format!("Offset {} is not a character boundary", offset)))
}

/// Replace `start..end` of `content`
///
/// Offsets count UTF-16 code units, as a textarea's `selectionStart` and
/// `selectionEnd` do.
#[wasm_bindgen(js_name = splice)]
pub fn splice_js(content: &str, start: usize, end: usize, replacement: &str) -> Result<String, JsValue> {
    let (start, end) = (byte_offset(content, start)?, byte_offset(content, end)?);
    selection::splice(content, start, end, replacement)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Insert a mention of an asset at `offset`, in UTF-16 code units
#[wasm_bindgen(js_name = insertReference)]
pub fn insert_reference_js(content: &str, offset: usize, id: &str, name: &str) -> Result<String, JsValue> {
    let token = encode_reference_js(id, name)?;
    let offset = byte_offset(content, offset)?;
    selection::insert_at(content, offset, &token).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Render page content against an asset catalog (JSON array)
#[wasm_bindgen(js_name = renderContentHtml)]
pub fn render_content_html_js(content: &str, assets_json: &str) -> Result<String, JsValue> {
    let assets = parse_assets(assets_json)?;
    Ok(html::render_content(&Renderer::new(&assets), content))
}

/// Render the reading page of a published project
#[wasm_bindgen(js_name = renderReadingPage)]
pub fn render_reading_page_js(
    projects_json: &str,
    assets_json: &str,
    project_id: &str,
    page_id: Option<String>,
) -> Result<String, JsValue> {
    let projects: Vec<Project> = serde_json::from_str(projects_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid projects: {}", e)))?;
    let assets = parse_assets(assets_json)?;
    let library = Library::new(&projects, &assets);

    match library.resolve(project_id) {
        Resolution::Found(mut view) => {
            if let Some(page_id) = page_id {
                view.select_page(&page_id)
                    .map_err(|e| JsValue::from_str(&e.to_string()))?;
            }
            Ok(html::render_reading_page(&view, HtmlOptions::default()))
        }
        Resolution::NotFound(not_found) => {
            Ok(html::render_not_found(&not_found, HtmlOptions::default()))
        }
    }
}

/// Ids mentioned in content that are missing from the catalog, as JSON
#[wasm_bindgen(js_name = danglingReferences)]
pub fn dangling_references_js(content: &str, assets_json: &str) -> Result<String, JsValue> {
    let assets = parse_assets(assets_json)?;
    let dangling = Renderer::new(&assets).dangling(content);
    serde_json::to_string(&dangling)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ASSETS: &str = r#"[{
        "id": "asset-1",
        "type": "character",
        "name": "Kael",
        "description": "",
        "data": {},
        "createdAt": "2024-01-01T00:00:00Z",
        "updatedAt": "2024-01-01T00:00:00Z"
    }]"#;

    #[test]
    fn test_decode_references() {
        let json = decode_references_js("Hi [[asset:asset-1:Kael]]").unwrap();
        assert_eq!(
            json,
            r#"[{"type":"text","text":"Hi "},{"type":"reference","id":"asset-1","name":"Kael"}]"#
        );
    }

    #[test]
    fn test_splice_and_insert() {
        assert_eq!(splice_js("Hello world", 6, 11, "earth").unwrap(), "Hello earth");
        assert_eq!(
            insert_reference_js("Hi .", 3, "asset-1", "Kael").unwrap(),
            "Hi [[asset:asset-1:Kael]]."
        );
    }

    #[test]
    fn test_offsets_count_utf16_units() {
        // "é" is one unit but two bytes
        assert_eq!(splice_js("Café world", 5, 10, "earth").unwrap(), "Café earth");
        // "🦀" is a surrogate pair
        assert_eq!(
            insert_reference_js("🦀 .", 3, "asset-1", "Kael").unwrap(),
            "🦀 [[asset:asset-1:Kael]]."
        );
    }

    #[test]
    fn test_utf16_offset_conversion() {
        assert_eq!(utf16_to_byte("a🦀b", 0), Some(0));
        assert_eq!(utf16_to_byte("a🦀b", 1), Some(1));
        // Inside the surrogate pair
        assert_eq!(utf16_to_byte("a🦀b", 2), None);
        assert_eq!(utf16_to_byte("a🦀b", 3), Some(5));
        assert_eq!(utf16_to_byte("a🦀b", 4), Some(6));
        assert_eq!(utf16_to_byte("a🦀b", 5), None);
        assert_eq!(utf16_to_byte("", 0), Some(0));
    }

    #[test]
    fn test_render_content_html() {
        let html = render_content_html_js("[[asset:asset-1:Kael]] & [[asset:x:Ghost]]", ASSETS).unwrap();
        assert!(html.contains("<button class=\"asset-mention\" data-asset-id=\"asset-1\">Kael</button> &amp; "));
        assert!(html.contains("asset-mention asset-missing"));
    }

    #[test]
    fn test_dangling_references() {
        let json = dangling_references_js("[[asset:x:Ghost]] [[asset:asset-1:Kael]]", ASSETS).unwrap();
        assert_eq!(json, r#"["x"]"#);
    }
}
