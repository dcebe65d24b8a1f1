//! Output for one evaluated catalog view.

use anyhow::Result;
use catalog_query::{QueryState, ResultPage};
use serde::Serialize;

use crate::records::Listing;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonView<'a, T: Serialize> {
    #[serde(flatten)]
    page: &'a ResultPage<&'a T>,
    query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    previous: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    next: Option<String>,
}

/// Links for the pager, relative to the current state.
fn links<T>(page: &ResultPage<T>, state: &QueryState) -> (Option<String>, Option<String>) {
    let previous = page
        .has_previous()
        .then(|| link(&state.clone().with_page(page.clamped_page().min(page.page - 1))));
    let next = page.has_next().then(|| link(&state.clone().next_page()));
    (previous, next)
}

fn link(state: &QueryState) -> String {
    format!("?{}", state.to_query_string())
}

/// Plain text: one line per record, then paging metadata and links.
pub fn plain<T: Listing>(page: &ResultPage<&T>, state: &QueryState) -> String {
    let mut out = String::new();

    if page.is_empty() {
        if page.total_items > 0 {
            out.push_str(&format!(
                "page {} is past the end; last page is {}\n",
                page.page,
                page.clamped_page()
            ));
        } else {
            out.push_str("no matching records\n");
        }
    }
    for item in &page.items {
        out.push_str(&item.line());
        out.push('\n');
    }

    out.push_str(&format!(
        "\npage {} of {} ({} matching, {} per page)\n",
        page.page,
        page.total_pages.max(1),
        page.total_items,
        page.page_size
    ));
    out.push_str(&format!("query: {}\n", link(state)));

    let (previous, next) = links(page, state);
    if let Some(previous) = previous {
        out.push_str(&format!("prev:  {}\n", previous));
    }
    if let Some(next) = next {
        out.push_str(&format!("next:  {}\n", next));
    }
    out
}

/// The result page as JSON, with the canonical query and pager links.
pub fn json<T: Serialize>(page: &ResultPage<&T>, state: &QueryState) -> Result<String> {
    let (previous, next) = links(page, state);
    let view = JsonView {
        page,
        query: link(state),
        previous,
        next,
    };
    Ok(serde_json::to_string_pretty(&view)?)
}
