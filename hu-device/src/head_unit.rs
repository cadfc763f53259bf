//! Scripted head unit session
//!
//! Stands in for the touchscreen: it drives the sync engine against the
//! simulated phone, walks through a fixed browsing script, and logs what the
//! screen would show.

use std::collections::VecDeque;

use hu_library::{
    active_catalog, paging, CatalogReader, FallbackCatalog, SelectionStore, Selections,
};
use hu_link::{format_duration, LinkError, LinkEvent, NavigationHandler, SyncEngine};
use hu_protocol::{ContextKind, QueryKind, TransportCommand};
use hu_sim::{VirtualPhone, VirtualRadio};
use tracing::{debug, info, warn};

use crate::settings::Settings;

/// Top-level browse lists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Browse {
    Playlists,
    Artists,
    Albums,
}

impl Browse {
    fn title(&self) -> &'static str {
        match self {
            Browse::Playlists => "Playlists",
            Browse::Artists => "Artists",
            Browse::Albums => "Albums",
        }
    }

    fn query(&self) -> QueryKind {
        match self {
            Browse::Playlists => QueryKind::PlaylistSongs,
            Browse::Artists => QueryKind::ArtistSongs,
            Browse::Albums => QueryKind::AlbumSongs,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Show(Browse),
    ConnectPhone,
    /// Open the remembered entry, moved forward by `offset`
    Open(Browse, usize),
    PlayFirst,
    Command(TransportCommand),
    DropLink,
    Reconnect,
}

const SCRIPT: &[Step] = &[
    Step::Show(Browse::Playlists),
    Step::ConnectPhone,
    Step::Show(Browse::Playlists),
    Step::Open(Browse::Playlists, 0),
    Step::PlayFirst,
    Step::Command(TransportCommand::NextSong),
    Step::Command(TransportCommand::PlayPause),
    Step::DropLink,
    Step::Reconnect,
    Step::Show(Browse::Artists),
    Step::Open(Browse::Artists, 1),
    Step::Show(Browse::Albums),
    Step::Open(Browse::Albums, 1),
    Step::PlayFirst,
    Step::Command(TransportCommand::PrevSong),
];

pub struct HeadUnit {
    engine: SyncEngine<VirtualRadio>,
    phone: VirtualPhone,
    selections: Selections<Box<dyn SelectionStore>>,
    fallback: FallbackCatalog,
    script: VecDeque<Step>,
    step_ticks: u32,
    ticks_until_step: u32,
    ticks_per_second: u32,
    ticks: u64,
    finished: bool,
}

impl HeadUnit {
    pub fn new(settings: &Settings, store: Box<dyn SelectionStore>) -> Self {
        let radio = VirtualRadio::with_mtu(settings.mtu);
        let ticks_per_second = (1000 / settings.tick_interval_ms.max(1)).max(1);

        Self {
            engine: SyncEngine::with_config(radio, settings.link.clone()),
            phone: VirtualPhone::from_config(settings.phone.clone()),
            selections: Selections::new(store),
            fallback: FallbackCatalog::new(),
            script: SCRIPT.iter().copied().collect(),
            step_ticks: settings.step_ticks.max(1),
            ticks_until_step: settings.step_ticks.max(1),
            ticks_per_second: u32::try_from(ticks_per_second).unwrap_or(u32::MAX),
            ticks: 0,
            finished: false,
        }
    }

    /// Load selection memory and bring the radio up
    pub fn start(&mut self) -> Result<(), LinkError> {
        self.selections.load_selections();
        self.engine.start()
    }

    /// The script has run and one more step period has passed
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// One main loop iteration
    pub fn tick(&mut self) {
        self.phone.exchange(self.engine.radio_mut());
        self.engine.tick();

        for event in self.engine.drain_events() {
            self.on_event(event);
        }

        self.ticks += 1;
        if self.ticks % u64::from(self.ticks_per_second) == 0 {
            self.phone.advance(1);
            self.engine.playback_mut().advance(1);
        }

        self.ticks_until_step -= 1;
        if self.ticks_until_step == 0 {
            self.ticks_until_step = self.step_ticks;
            match self.script.pop_front() {
                Some(step) => self.run(step),
                None => self.finished = true,
            }
        }
    }

    fn on_event(&mut self, event: LinkEvent) {
        match &event {
            LinkEvent::CatalogReplaced {
                table,
                stored,
                rejected,
            } => {
                info!("Catalog {}: {} entries", table, stored);
                if *rejected > 0 {
                    warn!("{} {} did not fit", rejected, table);
                }
            }
            LinkEvent::SongStarted { .. } | LinkEvent::PlaybackChanged => self.show_now_playing(),
            LinkEvent::FrameDropped { reason } => warn!("Link error: {}", reason),
            _ => debug!("Link event: {:?}", event),
        }
    }

    fn run(&mut self, step: Step) {
        debug!("Script step {:?}", step);
        match step {
            Step::Show(list) => self.show(list),
            Step::ConnectPhone | Step::Reconnect => {
                if self.engine.radio_mut().connect() {
                    info!("{} connected", self.phone.name());
                    self.phone.push_catalog();
                } else if step == Step::Reconnect {
                    debug!("Radio not advertising yet; retrying");
                    self.script.push_front(step);
                } else {
                    warn!("Radio not advertising; cannot connect");
                }
            }
            Step::Open(list, offset) => self.open(list, offset),
            Step::PlayFirst => self.play_first(),
            Step::Command(command) => self.engine.send_command(command),
            Step::DropLink => {
                info!("{} went out of range", self.phone.name());
                self.engine.radio_mut().disconnect();
                self.phone.reset_link();
            }
        }
    }

    fn remembered(&self, list: Browse) -> usize {
        usize::from(match list {
            Browse::Playlists => self.selections.last_playlist_index(),
            Browse::Artists => self.selections.last_artist_index(),
            Browse::Albums => self.selections.last_album_index(),
        })
    }

    fn names(catalog: &dyn CatalogReader, list: Browse) -> Vec<String> {
        match list {
            Browse::Playlists => catalog.playlists().iter().map(|p| p.name.to_string()).collect(),
            Browse::Artists => catalog.artists().iter().map(|a| a.name.to_string()).collect(),
            Browse::Albums => catalog
                .albums()
                .iter()
                .map(|a| format!("{} ({})", a.name, a.year))
                .collect(),
        }
    }

    fn show(&self, list: Browse) {
        let catalog = active_catalog(self.engine.cache(), &self.fallback);
        let names = Self::names(catalog, list);
        let page = paging::initial_page(self.remembered(list), names.len());
        let source = if self.engine.cache().has_remote_data() {
            "phone"
        } else {
            "built-in"
        };

        info!(
            "{} page {}/{} ({}): {:?}",
            list.title(),
            page + 1,
            paging::page_count(names.len()),
            source,
            &names[paging::page_range(page, names.len())]
        );
    }

    fn open(&mut self, list: Browse, offset: usize) {
        let cache = self.engine.cache();
        let count = match list {
            Browse::Playlists => cache.playlist_count(),
            Browse::Artists => cache.artist_count(),
            Browse::Albums => cache.album_count(),
        };
        if count == 0 {
            warn!("No {} to open", list.title());
            return;
        }

        let index = (self.remembered(list) + offset) % count;
        let id = match list {
            Browse::Playlists => cache.playlist(index).map(|p| p.id.to_string()),
            Browse::Artists => cache.artist(index).map(|a| a.id.to_string()),
            Browse::Albums => cache.album(index).map(|a| a.id.to_string()),
        };
        let Some(id) = id else {
            return;
        };

        let position = u8::try_from(index).unwrap_or(u8::MAX);
        let saved = match list {
            Browse::Playlists => self.selections.select_playlist(position),
            Browse::Artists => self.selections.select_artist(position),
            Browse::Albums => self.selections.select_album(position),
        };
        if let Err(e) = saved {
            warn!("Failed to save selection: {}", e);
        }

        info!("Opening {} #{} ({})", list.title(), index, id);
        self.engine.query(list.query(), &id);
    }

    fn play_first(&mut self) {
        let cache = self.engine.cache();
        let Some(song) = cache.song(0) else {
            warn!("Song list still loading");
            return;
        };
        let song_id = song.id.to_string();
        let context = cache.song_context().clone();
        info!(
            "{} songs in {} {:?}",
            cache.song_count(),
            context.type_name(),
            context.id()
        );

        let kind = context.kind();
        if kind == ContextKind::None {
            warn!("Playing outside of any list");
        }
        self.engine.request_play(&song_id, kind, context.id(), 0);
    }

    fn show_now_playing(&self) {
        let playback = self.engine.playback();
        if let Some(current) = &playback.current {
            info!(
                "{} {} - {} [{} / {}]",
                if playback.playing { "▶" } else { "⏸" },
                current.artist,
                current.title,
                format_duration(playback.progress_sec),
                format_duration(current.duration_sec)
            );
        }
    }
}
