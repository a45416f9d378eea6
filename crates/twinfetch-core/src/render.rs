//! Writes a lookup result into a page
//!
//! Writes happen strictly in order, source side first. The first failing
//! write aborts the pass; earlier writes are not rolled back.

use crate::error::FetchError;
use crate::page::{self, Page};
use crate::record::{Record, TwinResponse};

/// Element ids receiving one side of the result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SideTargets {
    pub name: String,
    pub image: String,
    pub owner: String,
    pub hyperlink: String,
}

impl SideTargets {
    pub fn new(
        name: impl Into<String>,
        image: impl Into<String>,
        owner: impl Into<String>,
        hyperlink: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            image: image.into(),
            owner: owner.into(),
            hyperlink: hyperlink.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderTargets {
    pub source: SideTargets,
    pub twin: SideTargets,
}

impl Default for RenderTargets {
    fn default() -> Self {
        Self {
            source: SideTargets::new(
                page::SOURCE_NAME,
                page::SOURCE_IMG,
                page::SOURCE_OWNER,
                page::SOURCE_HYPERLINK,
            ),
            twin: SideTargets::new(
                page::TWIN_NAME,
                page::TWIN_IMG,
                page::TWIN_OWNER,
                page::TWIN_HYPERLINK,
            ),
        }
    }
}

/// Render both sides of `response` into `page`
pub fn render(
    page: &Page,
    targets: &RenderTargets,
    response: &TwinResponse,
) -> Result<(), FetchError> {
    let source = response
        .source
        .as_ref()
        .ok_or(FetchError::MissingRecord("Source"))?;
    render_side(page, &targets.source, source)?;

    let twin = response
        .twin
        .as_ref()
        .ok_or(FetchError::MissingRecord("Twin"))?;
    render_side(page, &targets.twin, twin)
}

fn render_side(page: &Page, targets: &SideTargets, record: &Record) -> Result<(), FetchError> {
    page.set_text(&targets.name, record.name.as_str())?;
    page.set_attribute(&targets.image, "src", record.image.as_str())?;
    page.set_text(&targets.owner, record.owner.as_str())?;
    page.set_text(&targets.hyperlink, record.listing_label())?;
    page.set_attribute(&targets.hyperlink, "href", record.hyperlink.as_str())
}
