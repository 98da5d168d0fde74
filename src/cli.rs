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

use clap::Args;
use clap::Parser;

use crate::cmd::check::check_collection;
use crate::cmd::delete::delete_revision;
use crate::cmd::export::export_collection;
use crate::cmd::list::list_pages;
use crate::cmd::page::show_page;
use crate::cmd::record::RecordArgs;
use crate::cmd::record::record_revision;
use crate::cmd::serve::ServeArgs;
use crate::cmd::serve::start_server;
use crate::db::RevisionId;
use crate::error::Fallible;
use crate::report::Format;
use crate::types::date::Date;
use crate::types::page::Page;
use crate::view::View;

#[derive(Parser)]
#[command(version, about, long_about = None)]
enum Command {
    /// Record a revision of a page.
    Record {
        /// The page that was revised.
        page: Page,
        /// Number of word mistakes.
        #[arg(long, short, default_value_t = 0)]
        words: u32,
        /// Number of line mistakes.
        #[arg(long, short, default_value_t = 0)]
        lines: u32,
        /// The day of the revision, as YYYY-MM-DD. Defaults to today.
        #[arg(long)]
        date: Option<String>,
        #[command(flatten)]
        common: Common,
    },
    /// List every revised page.
    Pages {
        #[arg(long, default_value_t = Format::Text)]
        format: Format,
        #[command(flatten)]
        common: Common,
    },
    /// List the pages that are due.
    Due {
        #[arg(long, default_value_t = Format::Text)]
        format: Format,
        #[command(flatten)]
        common: Common,
    },
    /// Show a page's summary and revision history.
    Page {
        page: Page,
        #[arg(long, default_value_t = Format::Text)]
        format: Format,
        #[command(flatten)]
        common: Common,
    },
    /// Delete a recorded revision.
    Delete {
        revision_id: RevisionId,
        #[command(flatten)]
        common: Common,
    },
    /// Export every page's summary and history as JSON.
    Export {
        #[command(flatten)]
        common: Common,
    },
    /// Validate the configuration and the revision history.
    Check {
        #[command(flatten)]
        common: Common,
    },
    /// Serve a read-only dashboard.
    Serve {
        #[arg(long, default_value_t = 8000)]
        port: u16,
        /// Don't open the browser.
        #[arg(long)]
        no_open: bool,
        #[command(flatten)]
        common: Common,
    },
}

#[derive(Args)]
struct Common {
    /// Path to the collection directory. Defaults to the current directory.
    #[arg(long, short = 'C')]
    directory: Option<String>,
    /// Evaluate as of this day, as YYYY-MM-DD. Defaults to today.
    #[arg(long)]
    today: Option<String>,
}

impl Common {
    fn today(&self) -> Fallible<Date> {
        parse_date_or_today(self.today.as_deref())
    }
}

fn parse_date_or_today(date: Option<&str>) -> Fallible<Date> {
    match date {
        Some(date) => Date::parse(date),
        None => Ok(Date::today()),
    }
}

pub async fn entrypoint() -> Fallible<()> {
    let cli: Command = Command::parse();
    match cli {
        Command::Record {
            page,
            words,
            lines,
            date,
            common,
        } => {
            let today = common.today()?;
            let date = match date {
                Some(date) => Date::parse(&date)?,
                None => today,
            };
            let args = RecordArgs {
                page,
                word_mistakes: words,
                line_mistakes: lines,
                date,
                today,
            };
            record_revision(common.directory, args)
        }
        Command::Pages { format, common } => {
            let today = common.today()?;
            list_pages(common.directory, View::All, format, today)
        }
        Command::Due { format, common } => {
            let today = common.today()?;
            list_pages(common.directory, View::Due, format, today)
        }
        Command::Page {
            page,
            format,
            common,
        } => {
            let today = common.today()?;
            show_page(common.directory, page, format, today)
        }
        Command::Delete {
            revision_id,
            common,
        } => delete_revision(common.directory, revision_id),
        Command::Export { common } => {
            let today = common.today()?;
            export_collection(common.directory, today)
        }
        Command::Check { common } => {
            let today = common.today()?;
            check_collection(common.directory, today)
        }
        Command::Serve {
            port,
            no_open,
            common,
        } => {
            let args = ServeArgs {
                port,
                today: common.today()?,
                open_browser: !no_open,
            };
            start_server(common.directory, args).await
        }
    }
}
