// SPDX-License-Identifier: MPL-2.0
//! Headless review driver.
//!
//! Reviews the images of one directory, reading one command per line from
//! stdin. Albums are kept in `albums.toml` inside the directory; deleted
//! photos are moved to its trash folder.

use photo_swipe::application::controller::ReviewController;
use photo_swipe::application::session::ReviewState;
use photo_swipe::config;
use photo_swipe::domain::gesture::GestureVector;
use photo_swipe::infrastructure::{FsLibrary, ImagePreviewDecoder, TomlCollectionStore};
use photo_swipe::{Error, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "\
photo-swipe: sort the photos of a directory by swiping

USAGE:
  photo-swipe [OPTIONS] <DIR>

OPTIONS:
  --config-dir <DIR>   Read settings.toml from DIR
  --newest-first       Review newest photos first
  -h, --help           Print help

COMMANDS (stdin):
  left | right | up | down | skip
  swipe <DX> <DY>      Classify an arbitrary drag
  undo                 Revert the last swipe
  hide                 Hide photos already in an album
  buckets              Show bucket contents
  commit               Apply buckets to the library
  quit                 Leave (refused while swipes are unsaved; quit! forces)
";

/// Far past any valid threshold.
const FLICK: f32 = 10_000.0;

struct Flags {
    dir: PathBuf,
    config_dir: Option<PathBuf>,
    newest_first: bool,
}

fn parse_flags() -> std::result::Result<Option<Flags>, pico_args::Error> {
    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        return Ok(None);
    }
    let config_dir = args.opt_value_from_str("--config-dir")?;
    let newest_first = args.contains("--newest-first");
    let dir = args.free_from_str()?;
    Ok(Some(Flags {
        dir,
        config_dir,
        newest_first,
    }))
}

enum Command {
    Swipe(GestureVector),
    Undo,
    Hide,
    Buckets,
    Commit,
    Quit { force: bool },
}

fn parse_command(line: &str) -> Option<Command> {
    let mut words = line.split_whitespace();
    let command = match words.next()? {
        "left" | "l" => Command::Swipe(GestureVector::new(-FLICK, 0.0)),
        "right" | "r" => Command::Swipe(GestureVector::new(FLICK, 0.0)),
        "up" | "u" => Command::Swipe(GestureVector::new(0.0, -FLICK)),
        "down" | "d" | "skip" | "s" => Command::Swipe(GestureVector::new(0.0, FLICK)),
        "swipe" => {
            let dx = words.next()?.parse().ok()?;
            let dy = words.next()?.parse().ok()?;
            Command::Swipe(GestureVector::new(dx, dy))
        }
        "undo" | "z" => Command::Undo,
        "hide" => Command::Hide,
        "buckets" | "b" => Command::Buckets,
        "commit" => Command::Commit,
        "quit" | "q" => Command::Quit { force: false },
        "quit!" => Command::Quit { force: true },
        _ => return None,
    };
    Some(command)
}

fn print_status(review: &ReviewController, library: &FsLibrary) {
    let session = review.session();
    match (session.state(), session.current()) {
        (ReviewState::Reviewing, Some(entry)) => {
            let name = library
                .path_of(entry.handle.id())
                .and_then(|p| p.file_name())
                .map_or_else(|| entry.handle.id().to_string(), |n| n.to_string_lossy().into_owned());
            let preview = match entry.preview.image() {
                Some(image) => format!("{}x{}", image.width(), image.height()),
                None if entry.preview.is_pending() => "loading".to_string(),
                None => "unreadable".to_string(),
            };
            println!(
                "[{}/{}] {name} ({preview})",
                session.cursor() + 1,
                session.buffer().len()
            );
        }
        _ => println!("review complete"),
    }
}

fn print_buckets(review: &ReviewController) {
    for bucket in review.session().buckets().iter() {
        println!("{:>12}: {}", bucket.label(), bucket.len());
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    let flags = match parse_flags() {
        Ok(Some(flags)) => flags,
        Ok(None) => {
            print!("{HELP}");
            return Ok(());
        }
        Err(err) => {
            eprint!("error: {err}\n\n{HELP}");
            return Err(Error::Config(err.to_string()));
        }
    };

    let (mut settings, warning) = config::load_with_override(flags.config_dir);
    if let Some(warning) = warning {
        eprintln!("warning: {warning}");
    }
    if flags.newest_first {
        settings.review.oldest_first = Some(false);
    }

    let library = Arc::new(FsLibrary::scan(&flags.dir)?);
    let store = TomlCollectionStore::open(Arc::clone(&library))?;
    let decoder = Arc::new(ImagePreviewDecoder::new(Arc::clone(&library)));

    let mut review = ReviewController::open(&*library, &*library, decoder, &settings).await?;
    // Show a decoded first photo when there is one.
    review.next_completion().await;
    print_status(&review, &library);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        review.drain_completions();
        let Some(command) = parse_command(&line) else {
            if !line.trim().is_empty() {
                println!("unknown command, try --help");
            }
            continue;
        };

        match command {
            Command::Swipe(vector) => match review.swipe(vector) {
                Ok(advance) => {
                    let target = advance
                        .bucket
                        .and_then(|id| review.session().buckets().get(id))
                        .map_or("skipped", |b| b.label());
                    println!("-> {target}");
                }
                Err(err) => println!("{err}"),
            },
            Command::Undo => {
                if review.undo().is_none() {
                    println!("nothing to undo");
                }
            }
            Command::Hide => match review.hide_collected(&store).await {
                Ok(removed) => println!("hid {removed} photos already in albums"),
                Err(err) => println!("could not read albums: {err}"),
            },
            Command::Buckets => print_buckets(&review),
            Command::Commit => {
                let report = review.commit(&store).await;
                if report.is_empty() {
                    println!("nothing to commit");
                }
                for (id, result) in report.iter() {
                    match result {
                        Ok(outcome) => println!("{id}: {outcome:?}"),
                        Err(err) => println!("{id}: failed: {err}"),
                    }
                }
            }
            Command::Quit { force } => {
                if force || !review.has_unsaved_swipes() {
                    break;
                }
                println!("unsaved swipes; run `commit` or `quit!`");
                continue;
            }
        }
        print_status(&review, &library);
    }
    Ok(())
}
