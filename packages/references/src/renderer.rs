//! Pairs decoded content with the asset catalog
//!
//! Rendering never fails: a mention whose id is missing from the catalog is
//! still shown with its embedded display name, and activating it reports
//! [`Activation::NotFound`] instead of erroring.

use crate::codec::{decode, Segment, Segments};
use folio_model::{Asset, AssetType};
use serde::Serialize;
use std::collections::HashMap;

/// Id lookup over a borrowed asset catalog
///
/// When two assets share an id the first one in catalog order wins.
#[derive(Debug, Clone, Default)]
pub struct AssetIndex<'a> {
    by_id: HashMap<&'a str, &'a Asset>,
}

impl<'a> AssetIndex<'a> {
    pub fn new(assets: &'a [Asset]) -> Self {
        let mut by_id = HashMap::with_capacity(assets.len());
        for asset in assets {
            by_id.entry(asset.id.as_str()).or_insert(asset);
        }
        Self { by_id }
    }

    pub fn get(&self, id: &str) -> Option<&'a Asset> {
        self.by_id.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Resolve a mention activation
    pub fn open(&self, id: &str) -> Activation<'a> {
        match self.get(id) {
            Some(asset) => Activation::Detail(AssetDetail { asset }),
            None => Activation::NotFound { id: id.to_string() },
        }
    }
}

/// Read-only view of an asset for a detail panel
#[derive(Debug, Clone, Copy)]
pub struct AssetDetail<'a> {
    asset: &'a Asset,
}

impl<'a> AssetDetail<'a> {
    pub fn id(&self) -> &'a str {
        &self.asset.id
    }

    pub fn name(&self) -> &'a str {
        &self.asset.name
    }

    pub fn asset_type(&self) -> AssetType {
        self.asset.asset_type
    }

    /// Type label as shown to readers ("character", "location", ...)
    pub fn type_label(&self) -> &'static str {
        self.asset.asset_type.as_str()
    }

    pub fn description(&self) -> &'a str {
        &self.asset.description
    }

    pub fn image_url(&self) -> Option<&'a str> {
        self.asset.data.image_url.as_deref()
    }

    pub fn asset(&self) -> &'a Asset {
        self.asset
    }
}

/// Result of activating a mention
#[derive(Debug, Clone)]
pub enum Activation<'a> {
    Detail(AssetDetail<'a>),
    /// The mention points at an asset that no longer exists
    NotFound { id: String },
}

impl<'a> Activation<'a> {
    pub fn detail(&self) -> Option<&AssetDetail<'a>> {
        match self {
            Activation::Detail(detail) => Some(detail),
            Activation::NotFound { .. } => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Activation::NotFound { .. })
    }
}

/// Segment ready for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RenderedSegment<'c> {
    #[serde(rename_all = "camelCase")]
    PlainText { text: &'c str },
    #[serde(rename_all = "camelCase")]
    AssetMention {
        id: &'c str,
        /// Name embedded in the token, which may differ from the asset's
        /// current name after a rename
        display_name: &'c str,
        resolved: bool,
    },
}

/// Renders page content against a catalog
#[derive(Debug, Clone)]
pub struct Renderer<'a> {
    index: AssetIndex<'a>,
}

impl<'a> Renderer<'a> {
    pub fn new(assets: &'a [Asset]) -> Self {
        Self {
            index: AssetIndex::new(assets),
        }
    }

    pub fn index(&self) -> &AssetIndex<'a> {
        &self.index
    }

    /// Lazily render content into display segments
    pub fn render<'r, 'c>(&'r self, content: &'c str) -> Rendered<'r, 'a, 'c> {
        Rendered {
            index: &self.index,
            segments: decode(content),
        }
    }

    pub fn activate(&self, id: &str) -> Activation<'a> {
        self.index.open(id)
    }

    /// Ids mentioned in content that do not resolve, in first-seen order
    pub fn dangling<'c>(&self, content: &'c str) -> Vec<&'c str> {
        let mut seen = Vec::new();
        for segment in self.render(content) {
            if let RenderedSegment::AssetMention {
                id,
                resolved: false,
                ..
            } = segment
            {
                if !seen.contains(&id) {
                    seen.push(id);
                }
            }
        }
        seen
    }
}

/// Iterator returned by [`Renderer::render`]
#[derive(Debug, Clone)]
pub struct Rendered<'r, 'a, 'c> {
    index: &'r AssetIndex<'a>,
    segments: Segments<'c>,
}

impl<'r, 'a, 'c> Iterator for Rendered<'r, 'a, 'c> {
    type Item = RenderedSegment<'c>;

    fn next(&mut self) -> Option<Self::Item> {
        let segment = self.segments.next()?;
        Some(match segment {
            Segment::Text { text } => RenderedSegment::PlainText { text },
            Segment::Reference(reference) => RenderedSegment::AssetMention {
                id: reference.id,
                display_name: reference.name,
                resolved: self.index.contains(reference.id),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_common::ManualClock;

    fn catalog() -> Vec<Asset> {
        let clock = ManualClock::at_seconds(1_700_000_000);
        vec![
            Asset::with_id("asset-1", "Kael", AssetType::Character, &clock)
                .unwrap()
                .with_description("A grizzled cyber-detective haunted by his past."),
            Asset::with_id("asset-2", "Neo-Kyoto", AssetType::Location, &clock)
                .unwrap()
                .with_image_url("data:image/jpeg;base64,AAAA"),
        ]
    }

    #[test]
    fn test_render_resolves_known_ids() {
        let assets = catalog();
        let renderer = Renderer::new(&assets);
        let rendered: Vec<_> = renderer
            .render("Meet [[asset:asset-1:Kael]] in [[asset:gone:Old Pier]].")
            .collect();

        assert_eq!(
            rendered,
            vec![
                RenderedSegment::PlainText { text: "Meet " },
                RenderedSegment::AssetMention {
                    id: "asset-1",
                    display_name: "Kael",
                    resolved: true
                },
                RenderedSegment::PlainText { text: " in " },
                RenderedSegment::AssetMention {
                    id: "gone",
                    display_name: "Old Pier",
                    resolved: false
                },
                RenderedSegment::PlainText { text: "." },
            ]
        );
    }

    #[test]
    fn test_activate_known_asset() {
        let assets = catalog();
        let renderer = Renderer::new(&assets);

        let activation = renderer.activate("asset-1");
        let detail = activation.detail().expect("asset-1 should resolve");
        assert_eq!(detail.name(), "Kael");
        assert_eq!(detail.type_label(), "character");
        assert_eq!(
            detail.description(),
            "A grizzled cyber-detective haunted by his past."
        );
        assert_eq!(detail.image_url(), None);

        let location = renderer.activate("asset-2");
        assert_eq!(
            location.detail().and_then(|d| d.image_url()),
            Some("data:image/jpeg;base64,AAAA")
        );
    }

    #[test]
    fn test_activate_dangling_reference() {
        let assets = catalog();
        let renderer = Renderer::new(&assets);

        match renderer.activate("missing") {
            Activation::NotFound { id } => assert_eq!(id, "missing"),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_ids_first_wins() {
        let clock = ManualClock::default();
        let assets = vec![
            Asset::with_id("dup", "First", AssetType::Item, &clock).unwrap(),
            Asset::with_id("dup", "Second", AssetType::Item, &clock).unwrap(),
        ];
        let index = AssetIndex::new(&assets);

        assert_eq!(index.len(), 1);
        assert_eq!(index.get("dup").map(|a| a.name.as_str()), Some("First"));
    }

    #[test]
    fn test_dangling_report_is_deduplicated() {
        let assets = catalog();
        let renderer = Renderer::new(&assets);
        let content = "[[asset:x:X]] [[asset:asset-1:Kael]] [[asset:y:Y]] [[asset:x:X again]]";

        assert_eq!(renderer.dangling(content), vec!["x", "y"]);
    }

    #[test]
    fn test_empty_catalog_renders_everything_unresolved() {
        let renderer = Renderer::new(&[]);
        assert!(renderer.index().is_empty());
        assert!(renderer
            .render("[[asset:a:A]]")
            .all(|s| matches!(s, RenderedSegment::AssetMention { resolved: false, .. })));
    }
}
