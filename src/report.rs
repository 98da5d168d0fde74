// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::fmt::Formatter;

use clap::ValueEnum;
use maud::DOCTYPE;
use maud::Markup;
use maud::html;
use serde::Serialize;

use crate::db::RevisionRow;
use crate::error::Fallible;
use crate::types::date::Date;
use crate::types::page::Page;
use crate::types::summary::PageSummary;
use crate::view::View;

#[derive(ValueEnum, Clone, Copy, PartialEq, Eq, Debug)]
pub enum Format {
    /// Plain text table.
    Text,
    /// JSON output.
    Json,
    /// HTML output.
    Html,
}

impl Display for Format {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Format::Text => write!(f, "text"),
            Format::Json => write!(f, "json"),
            Format::Html => write!(f, "html"),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Report<'a> {
    view: String,
    today: Date,
    next_due_page: Option<Page>,
    pages: Vec<PageEntry<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PageEntry<'a> {
    page: Page,
    #[serde(flatten)]
    summary: &'a PageSummary,
}

/// Render a listing of page summaries in the given format.
pub fn render_listing(
    format: Format,
    view: View,
    today: Date,
    summaries: &BTreeMap<Page, PageSummary>,
    next_due_page: Option<Page>,
) -> Fallible<String> {
    match format {
        Format::Text => {
            let mut out = text_table(view, summaries);
            match next_due_page {
                Some(page) => out.push_str(&format!("\nNext due page: {page}\n")),
                None => {
                    if view == View::Due {
                        out.push_str("\nNo pages due.\n");
                    }
                }
            }
            Ok(out)
        }
        Format::Json => {
            let report = Report {
                view: view.to_string(),
                today,
                next_due_page,
                pages: summaries
                    .iter()
                    .map(|(page, summary)| PageEntry {
                        page: *page,
                        summary,
                    })
                    .collect(),
            };
            Ok(serde_json::to_string_pretty(&report)?)
        }
        Format::Html => {
            let body = html! {
                h1 { (view.title()) }
                p { "As of " (today) }
                (summary_table(view, summaries))
            };
            Ok(page_template(view.title(), body).into_string())
        }
    }
}

/// Render a single page's history and summary.
pub fn render_page(
    format: Format,
    page: Page,
    rows: &[RevisionRow],
    summary: Option<&PageSummary>,
) -> Fallible<String> {
    match format {
        Format::Text => {
            let mut out = format!("Page {page}\n");
            match summary {
                Some(summary) => {
                    let single = BTreeMap::from([(page, summary.clone())]);
                    out.push_str(&text_table(View::Entry, &single));
                }
                None => out.push_str("New page, never revised.\n"),
            }
            if !rows.is_empty() {
                out.push('\n');
                let header = ["Id", "Date", "Words", "Lines", "Interval"];
                let body: Vec<Vec<String>> = rows.iter().map(revision_cells).collect();
                out.push_str(&align(&header, &body));
            }
            Ok(out)
        }
        Format::Json => {
            #[derive(Serialize)]
            #[serde(rename_all = "camelCase")]
            struct PageReport<'a> {
                page: Page,
                summary: Option<&'a PageSummary>,
                revisions: &'a [RevisionRow],
            }
            let report = PageReport {
                page,
                summary,
                revisions: rows,
            };
            Ok(serde_json::to_string_pretty(&report)?)
        }
        Format::Html => {
            let title = format!("Page {page}");
            let body = page_body(page, rows, summary);
            Ok(page_template(&title, body).into_string())
        }
    }
}

pub fn page_template(title: &str, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { "quran-srs: " (title) }
                link rel="stylesheet" href="/style.css";
            }
            body {
                nav {
                    a href="/" { "All" }
                    " "
                    a href="/due" { "Due" }
                }
                (body)
            }
        }
    }
}

pub fn summary_table(view: View, summaries: &BTreeMap<Page, PageSummary>) -> Markup {
    let keys = view.keys();
    html! {
        table {
            thead {
                tr {
                    th { "Page" }
                    @for key in &keys {
                        th { (key.label()) }
                    }
                }
            }
            tbody {
                @for (page, summary) in summaries {
                    tr .due[summary.is_due] {
                        td { a href={ "/page/" (page) } { (page) } }
                        @for key in &keys {
                            td { (key.value(summary)) }
                        }
                    }
                }
            }
        }
    }
}

pub fn page_body(page: Page, rows: &[RevisionRow], summary: Option<&PageSummary>) -> Markup {
    html! {
        h1 { "Page " (page) }
        @match summary {
            Some(summary) => {
                (summary_table(View::Entry, &BTreeMap::from([(page, summary.clone())])))
            }
            None => {
                p { "New page, never revised." }
            }
        }
        @if !rows.is_empty() {
            h2 { "Revisions" }
            table {
                thead {
                    tr {
                        th { "Date" }
                        th { "Word Mistakes" }
                        th { "Line Mistakes" }
                        th { "Interval" }
                    }
                }
                tbody {
                    @for row in rows {
                        tr {
                            td { (row.revision.date) }
                            td { (row.revision.word_mistakes) }
                            td { (row.revision.line_mistakes) }
                            td { (row.revision.previous_interval) }
                        }
                    }
                }
            }
        }
    }
}

fn text_table(view: View, summaries: &BTreeMap<Page, PageSummary>) -> String {
    let keys = view.keys();
    let mut header: Vec<&str> = vec!["Page"];
    header.extend(keys.iter().map(|key| key.label()));
    let body: Vec<Vec<String>> = summaries
        .iter()
        .map(|(page, summary)| {
            let mut cells = vec![page.to_string()];
            cells.extend(keys.iter().map(|key| key.value(summary)));
            cells
        })
        .collect();
    align(&header, &body)
}

fn revision_cells(row: &RevisionRow) -> Vec<String> {
    vec![
        row.revision_id.to_string(),
        row.revision.date.to_string(),
        row.revision.word_mistakes.to_string(),
        row.revision.line_mistakes.to_string(),
        row.revision.previous_interval.to_string(),
    ]
}

/// Lay out rows in columns, padding each to its widest cell.
fn align(header: &[&str], body: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = header.iter().map(|h| h.len()).collect();
    for row in body {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.len());
        }
    }
    let mut out = String::new();
    let line = |cells: Vec<&str>| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect();
        format!("{}\n", padded.join("  ").trim_end())
    };
    out.push_str(&line(header.to_vec()));
    for row in body {
        out.push_str(&line(row.iter().map(String::as_str).collect()));
    }
    out
}
