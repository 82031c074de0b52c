//! Command line front end.
//!
//! Every command opens the SQLite database named by the config, so the
//! catalog, the counter endpoint and the gallery all see the same rows.

use std::ffi::OsStr;
use std::io::BufRead;
use std::path::PathBuf;
use std::thread;

use anyhow::{anyhow, bail, Context, Result};
use tokio::task::{JoinHandle, LocalSet};
use tracing::{debug, info, warn};

use crate::api::{LikeEndpoint, LikeRequest};
use crate::config::Config;
use crate::gallery::{EndpointTransport, FocusTarget, Gallery, KeyResult, LikeTransport, SortKey};
use crate::models::{featured_order, AssetRoot, LikeDelta, MediaId};
use crate::storage::{Catalog, LikeCounterService};
use crate::ui::{DropdownInput, Key, LightboxInput, MediaView, PointerRegion, StickyBar, MEDIA_NOT_FOUND};

pub const USAGE: &str = "\
Usage: folio [--db <path>] <command>

Commands:
  seed <photographers.json> <media.json>   Replace the catalog with the seed files
  photographers                            List photographers, featured first
  gallery <photographer-id> [--sort <key>] Print a photographer's gallery
  like <media-id> [--unlike]               Send one like to the counter
  session <photographer-id>                Drive a gallery from stdin
";

const SESSION_HELP: &str = "\
show | sort <popularity|date|title> | like <id> | open <id> | hover <option>
key <Enter|Space|Escape|Tab|ArrowUp|ArrowDown|ArrowLeft|ArrowRight|Home|End>
focus <sort|card <id>|like <id>|close|prev|next|page>
click <backdrop|frame|prev|next|close> | help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Seed { photographers: PathBuf, media: PathBuf },
    Photographers,
    Gallery { photographer_id: i64, sort: SortKey },
    Like { media_id: MediaId, delta: LikeDelta },
    Session { photographer_id: i64 },
}

fn parse_path(s: &OsStr) -> Result<PathBuf, &'static str> {
    Ok(PathBuf::from(s))
}

impl Command {
    /// Parse the subcommand and its arguments. Global flags must already have
    /// been taken out of `args`.
    pub fn from_args(mut args: pico_args::Arguments) -> Result<Self> {
        let Some(name) = args.subcommand()? else {
            bail!("Missing command\n\n{}", USAGE);
        };

        let command = match name.as_str() {
            "seed" => Command::Seed {
                photographers: args.free_from_os_str(parse_path)?,
                media: args.free_from_os_str(parse_path)?,
            },
            "photographers" => Command::Photographers,
            "gallery" => {
                let sort: Option<String> = args.opt_value_from_str("--sort")?;
                Command::Gallery {
                    photographer_id: args.free_from_str()?,
                    sort: sort.as_deref().map(SortKey::from_name).unwrap_or_default(),
                }
            }
            "like" => {
                let delta = if args.contains("--unlike") {
                    LikeDelta::Unlike
                } else {
                    LikeDelta::Like
                };
                Command::Like {
                    media_id: args.free_from_str()?,
                    delta,
                }
            }
            "session" => Command::Session {
                photographer_id: args.free_from_str()?,
            },
            other => bail!("Unknown command: {}\n\n{}", other, USAGE),
        };

        let rest = args.finish();
        if !rest.is_empty() {
            bail!("Unexpected arguments: {:?}", rest);
        }
        Ok(command)
    }
}

pub struct FolioApp {
    config: Config,
}

impl FolioApp {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn run(&self, command: Command) -> Result<()> {
        debug!(?command, database = ?self.config.database, "Running command");
        match command {
            Command::Seed {
                photographers,
                media,
            } => self.seed(&photographers, &media),
            Command::Photographers => self.photographers(),
            Command::Gallery {
                photographer_id,
                sort,
            } => self.gallery(photographer_id, sort),
            Command::Like { media_id, delta } => self.like(media_id, delta),
            Command::Session { photographer_id } => self.session(photographer_id),
        }
    }

    fn seed(&self, photographers: &std::path::Path, media: &std::path::Path) -> Result<()> {
        let mut catalog = Catalog::open(&self.config.database)?;
        let stats = catalog.seed_from_files(photographers, media)?;
        println!(
            "Seeded {} photographers and {} media into {:?}",
            stats.photographers, stats.media, self.config.database
        );
        Ok(())
    }

    fn photographers(&self) -> Result<()> {
        let catalog = Catalog::open(&self.config.database)?;
        let all = catalog.list_photographers()?;
        for p in featured_order(&all, &self.config.featured) {
            println!(
                "{:>5}  {:<24} {:<28} {}€ / jour  {}",
                p.id,
                p.name,
                p.location(),
                p.price,
                p.tagline
            );
        }
        println!("{} photographers, {} media", all.len(), catalog.count_media()?);
        Ok(())
    }

    fn gallery(&self, photographer_id: i64, sort: SortKey) -> Result<()> {
        let mut gallery = self.open_gallery(photographer_id)?;
        gallery.select_sort(sort);
        print_gallery(&gallery);
        Ok(())
    }

    fn like(&self, media_id: MediaId, delta: LikeDelta) -> Result<()> {
        let endpoint = LikeEndpoint::new(LikeCounterService::open(&self.config.database)?);
        let body = serde_json::to_string(&LikeRequest {
            media_id,
            delta: delta.value(),
        })?;

        let response = endpoint.handle(&body);
        println!("{}", response.body);
        if !response.is_success() {
            bail!("Like request failed with status {}", response.status);
        }
        Ok(())
    }

    fn session(&self, photographer_id: i64) -> Result<()> {
        let gallery = self.open_gallery(photographer_id)?;

        // Blocking stdin reads stay off the session loop
        let (tx, rx) = flume::unbounded::<String>();
        thread::Builder::new()
            .name("stdin-reader".into())
            .spawn(move || {
                for line in std::io::stdin().lock().lines() {
                    match line {
                        Ok(line) => {
                            if tx.send(line).is_err() {
                                break;
                            }
                        }
                        Err(e) => {
                            warn!("Failed to read stdin: {}", e);
                            break;
                        }
                    }
                }
            })
            .context("Failed to spawn stdin reader")?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("Failed to build tokio runtime")?;
        LocalSet::new().block_on(&runtime, run_session(gallery, rx))
    }

    fn open_gallery(&self, photographer_id: i64) -> Result<Gallery<EndpointTransport>> {
        let catalog = Catalog::open(&self.config.database)?;
        let photographer = catalog
            .get_photographer(photographer_id)?
            .ok_or_else(|| anyhow!("No photographer with id {}", photographer_id))?;
        let records = catalog.list_media_for_photographer(photographer_id)?;

        let endpoint = LikeEndpoint::new(LikeCounterService::open(&self.config.database)?);
        Ok(Gallery::new(
            photographer,
            records,
            EndpointTransport::new(endpoint),
            AssetRoot::new(self.config.asset_root.clone()),
        ))
    }
}

// =============================================================================
// Interactive session
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionCommand {
    Show,
    Sort(SortKey),
    Like(MediaId),
    Open(MediaId),
    Key(Key),
    /// Pointer over the sort menu option at this index.
    Hover(usize),
    Focus(FocusTarget),
    Click(LightboxInput),
    Help,
    Quit,
}

impl SessionCommand {
    fn parse(line: &str) -> Result<Self> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Ok(Self::Show);
        };
        let arg = words.next();

        let id = |arg: Option<&str>| -> Result<MediaId> {
            arg.ok_or_else(|| anyhow!("Missing media id"))?
                .parse()
                .context("Invalid media id")
        };

        let command = match verb {
            "show" => Self::Show,
            "sort" => Self::Sort(SortKey::from_name(arg.unwrap_or_default())),
            "like" => Self::Like(id(arg)?),
            "open" => Self::Open(id(arg)?),
            "key" => Self::Key(Key::from_name(arg.unwrap_or_default())),
            "hover" => Self::Hover(
                arg.ok_or_else(|| anyhow!("Missing option index"))?
                    .parse()
                    .context("Invalid option index")?,
            ),
            "focus" => Self::Focus(match arg {
                Some("sort") => FocusTarget::SortTrigger,
                Some("card") => FocusTarget::Card(id(words.next())?),
                Some("like") => FocusTarget::LikeButton(id(words.next())?),
                Some("close") => FocusTarget::ViewerClose,
                Some("prev") => FocusTarget::ViewerPrev,
                Some("next") => FocusTarget::ViewerNext,
                Some("page") => FocusTarget::Page,
                _ => bail!("Unknown focus target"),
            }),
            "click" => Self::Click(match arg {
                Some("backdrop") => LightboxInput::PointerDown(PointerRegion::Backdrop),
                Some("frame") => LightboxInput::PointerDown(PointerRegion::Frame),
                Some("prev") => LightboxInput::PrevClick,
                Some("next") => LightboxInput::NextClick,
                Some("close") => LightboxInput::CloseClick,
                _ => bail!("Unknown click target"),
            }),
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => bail!("Unknown command: {}", other),
        };
        Ok(command)
    }
}

async fn run_session<T>(mut gallery: Gallery<T>, lines: flume::Receiver<String>) -> Result<()>
where
    T: LikeTransport + 'static,
{
    let price = gallery.sticky_bar().price_per_day;
    gallery.connect_total_likes_changed(move |total_likes| {
        println!(
            "{}",
            StickyBar {
                total_likes,
                price_per_day: price,
            }
        );
    });

    info!(photographer = gallery.photographer().id, "Session started");
    print_gallery(&gallery);

    let mut in_flight: Vec<JoinHandle<()>> = Vec::new();
    while let Ok(line) = lines.recv_async().await {
        in_flight.retain(|task| !task.is_finished());

        let command = match SessionCommand::parse(&line) {
            Ok(command) => command,
            Err(e) => {
                println!("{:#}", e);
                continue;
            }
        };

        match command {
            SessionCommand::Show => print_gallery(&gallery),
            SessionCommand::Sort(key) => {
                gallery.select_sort(key);
                print_gallery(&gallery);
            }
            SessionCommand::Like(id) => in_flight.push(spawn_toggle(&gallery, id)),
            SessionCommand::Open(id) => {
                gallery.set_focus(FocusTarget::Card(id));
                if !gallery.open_viewer(id) {
                    println!("Cannot open media {}", id);
                }
            }
            SessionCommand::Key(key) => {
                if let KeyResult::ToggleLike(id) = gallery.handle_key(key) {
                    in_flight.push(spawn_toggle(&gallery, id));
                }
            }
            SessionCommand::Hover(index) => gallery.sort_input(DropdownInput::OptionHover(index)),
            SessionCommand::Focus(target) => gallery.set_focus(target),
            SessionCommand::Click(input) => gallery.viewer_input(input),
            SessionCommand::Help => println!("{}", SESSION_HELP),
            SessionCommand::Quit => break,
        }

        print_status(&gallery);
    }

    // Let pending likes settle so no count is left optimistic
    for task in in_flight {
        if let Err(e) = task.await {
            warn!("Like task failed: {}", e);
        }
    }
    info!("Session ended");
    Ok(())
}

/// Runs the toggle as its own task; dropping it midway would leave the item
/// stuck in the pending state.
fn spawn_toggle<T>(gallery: &Gallery<T>, media_id: MediaId) -> JoinHandle<()>
where
    T: LikeTransport + 'static,
{
    let likes = gallery.likes();
    tokio::task::spawn_local(async move {
        let outcome = likes.toggle_like(media_id).await;
        println!("like {}: {:?}", media_id, outcome);
    })
}

fn print_gallery<T: LikeTransport>(gallery: &Gallery<T>) {
    let photographer = gallery.photographer();
    println!("{} - {}", photographer.name, photographer.location());
    if !photographer.tagline.is_empty() {
        println!("{}", photographer.tagline);
    }
    println!("Trier par : {}", gallery.sort_menu().selected_label());

    for card in gallery.cards() {
        let heart = if card.liked { "♥" } else { "♡" };
        let kind = if card.is_video { "video" } else { "image" };
        let src = match card.src.as_deref() {
            Some(src) if card.can_open() => src,
            _ => MEDIA_NOT_FOUND,
        };
        println!(
            "{:>6}  {:<36} {:>5} {}{}  [{}] {}",
            card.id,
            card.title,
            card.likes,
            heart,
            if card.pending { " …" } else { "" },
            kind,
            src
        );
    }
    println!("{}", gallery.sticky_bar());
}

fn print_status<T: LikeTransport>(gallery: &Gallery<T>) {
    if let Some(view) = gallery.viewer() {
        let media = match &view.media {
            MediaView::Image { src, .. } | MediaView::Video { src } => src.as_str(),
            MediaView::NotFound => MEDIA_NOT_FOUND,
        };
        println!(
            "[{}/{}] {} - {}",
            view.index + 1,
            view.len,
            view.caption,
            media
        );
    }

    if let Some(active) = gallery.sort_menu().active_index() {
        let labels: Vec<String> = gallery
            .sort_menu()
            .menu_options()
            .iter()
            .enumerate()
            .map(|(i, o)| {
                if i == active {
                    format!("> {}", o.label)
                } else {
                    format!("  {}", o.label)
                }
            })
            .collect();
        println!("{}", labels.join("\n"));
    }

    println!("focus: {:?}", gallery.focus());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> pico_args::Arguments {
        pico_args::Arguments::from_vec(list.iter().map(|s| std::ffi::OsString::from(*s)).collect())
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            Command::from_args(args(&["gallery", "82", "--sort", "title"])).unwrap(),
            Command::Gallery {
                photographer_id: 82,
                sort: SortKey::Title
            }
        );
        assert_eq!(
            Command::from_args(args(&["like", "--unlike", "7"])).unwrap(),
            Command::Like {
                media_id: 7,
                delta: LikeDelta::Unlike
            }
        );
        assert_eq!(
            Command::from_args(args(&["seed", "p.json", "m.json"])).unwrap(),
            Command::Seed {
                photographers: "p.json".into(),
                media: "m.json".into()
            }
        );
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(Command::from_args(args(&[])).is_err());
        assert!(Command::from_args(args(&["dance"])).is_err());
        assert!(Command::from_args(args(&["like", "abc"])).is_err());
        assert!(Command::from_args(args(&["photographers", "extra"])).is_err());
    }

    #[test]
    fn test_parse_session_commands() {
        assert_eq!(SessionCommand::parse("").unwrap(), SessionCommand::Show);
        assert_eq!(
            SessionCommand::parse("sort date").unwrap(),
            SessionCommand::Sort(SortKey::Date)
        );
        assert_eq!(
            SessionCommand::parse("key ArrowDown").unwrap(),
            SessionCommand::Key(Key::ArrowDown)
        );
        assert_eq!(
            SessionCommand::parse("focus like 12").unwrap(),
            SessionCommand::Focus(FocusTarget::LikeButton(12))
        );
        assert_eq!(
            SessionCommand::parse("click backdrop").unwrap(),
            SessionCommand::Click(LightboxInput::PointerDown(PointerRegion::Backdrop))
        );
        assert_eq!(SessionCommand::parse("hover 1").unwrap(), SessionCommand::Hover(1));
        assert!(SessionCommand::parse("hover").is_err());
        assert!(SessionCommand::parse("like").is_err());
        assert!(SessionCommand::parse("focus nowhere").is_err());
    }
}
