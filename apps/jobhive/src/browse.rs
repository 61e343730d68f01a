//! Interactive browsing: one filter change per stdin line against a single
//! `JobBoard`. Search lines are debounced, so a burst of them (typing, or a
//! pasted block) only filters once, by the last one.

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use jobhive::listings::filters::{ALL_INDUSTRIES, ALL_LEVELS, ALL_LOCATIONS, ALL_TYPES};
use jobhive::listings::{DisplayMode, FilterUpdate, JobBoard};

use crate::{print_detail, print_listing, report};

const HELP: &str = "\
location <text>     filter by location (blank clears)
type <job type>     full-time, part-time, internship, contract, freelance
experience <level>  entry or internship
industry <name>
search <text>       title, company, location or skills
skills <a,b,..>     every listed skill must match
reset               back to all jobs
all | summary       every match, or the latest six
reload              fetch the feed again
show|apply|save <job id>
quit";

#[derive(Debug, PartialEq)]
pub enum BrowseCommand {
    Filter(FilterUpdate),
    Search(String),
    Reset,
    Mode(DisplayMode),
    Reload,
    Show(i64),
    Apply(i64),
    Save(i64),
    Help,
    Quit,
}

/// Blank lines parse to `None`.
pub fn parse_line(line: &str) -> Result<Option<BrowseCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    let or_all = |sentinel: &str| {
        if rest.is_empty() {
            sentinel.to_string()
        } else {
            rest.to_string()
        }
    };

    let command = match word.to_lowercase().as_str() {
        "location" => BrowseCommand::Filter(FilterUpdate::Location(or_all(ALL_LOCATIONS))),
        "type" => BrowseCommand::Filter(FilterUpdate::JobType(or_all(ALL_TYPES))),
        "experience" => BrowseCommand::Filter(FilterUpdate::Experience(or_all(ALL_LEVELS))),
        "industry" => BrowseCommand::Filter(FilterUpdate::Industry(or_all(ALL_INDUSTRIES))),
        "skills" => BrowseCommand::Filter(FilterUpdate::Skills(
            rest.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        )),
        "search" => BrowseCommand::Search(rest.to_string()),
        "reset" => BrowseCommand::Reset,
        "all" => BrowseCommand::Mode(DisplayMode::FullPage),
        "summary" => BrowseCommand::Mode(DisplayMode::Summary),
        "reload" => BrowseCommand::Reload,
        "show" => BrowseCommand::Show(job_id(rest)?),
        "apply" => BrowseCommand::Apply(job_id(rest)?),
        "save" => BrowseCommand::Save(job_id(rest)?),
        "help" | "?" => BrowseCommand::Help,
        "quit" | "exit" => BrowseCommand::Quit,
        other => return Err(format!("Unknown command '{other}'. Type 'help' for the list.")),
    };
    Ok(Some(command))
}

fn job_id(raw: &str) -> Result<i64, String> {
    raw.parse()
        .map_err(|_| format!("Expected a job id, got '{raw}'"))
}

pub async fn run(board: &mut JobBoard) -> Result<()> {
    board.load().await;
    print_listing(board);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let (settled_tx, mut settled_rx) = mpsc::unbounded_channel::<String>();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_line(&line) {
                    Ok(None) => {}
                    Ok(Some(BrowseCommand::Quit)) => break,
                    Ok(Some(BrowseCommand::Search(text))) => {
                        let debouncer = board.debouncer();
                        let tx = settled_tx.clone();
                        tokio::spawn(async move {
                            if let Some(settled) = debouncer.settle(text).await {
                                let _ = tx.send(settled);
                            }
                        });
                    }
                    Ok(Some(command)) => execute(board, command).await,
                    Err(msg) => eprintln!("{msg}"),
                }
            }
            Some(settled) = settled_rx.recv() => {
                board.apply_search(settled);
                print_listing(board);
            }
        }
    }

    // Let a search typed just before quitting land.
    drop(settled_tx);
    while let Some(settled) = settled_rx.recv().await {
        board.apply_search(settled);
        print_listing(board);
    }
    Ok(())
}

async fn execute(board: &mut JobBoard, command: BrowseCommand) {
    match command {
        BrowseCommand::Filter(update) => {
            board.update_filter(update);
            print_listing(board);
        }
        BrowseCommand::Reset => {
            board.reset_filters();
            print_listing(board);
        }
        BrowseCommand::Mode(mode) => {
            board.set_mode(mode);
            print_listing(board);
        }
        BrowseCommand::Reload => {
            board.load().await;
            print_listing(board);
        }
        BrowseCommand::Show(id) => {
            report(board.show(id).await.map(|view| {
                print_detail(&view);
                None
            }));
        }
        BrowseCommand::Apply(id) => {
            report(board.apply(id).await.map(Some));
        }
        BrowseCommand::Save(id) => {
            report(board.toggle_save(id).await.map(Some));
        }
        BrowseCommand::Help => println!("{HELP}"),
        BrowseCommand::Search(_) | BrowseCommand::Quit => {}
    }
}
