use std::time::Instant;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::engine::scoring::ScoreLedger;
use crate::generator::arithmetic::Mode;
use crate::generator::fetch::{StoryFetcher, StoryPayload, StoryReply};
use crate::session::SessionId;
use crate::session::daily::DailyProblemSession;
use crate::session::drill::DrillSession;
use crate::store::ScoreStore;
use crate::ui::components::menu::{Menu, MenuAction};
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Menu,
    Drill,
    Daily,
}

/// Top-level coordinator. Owns the process-wide score and at most one live
/// session; every score change is written to the store before returning.
pub struct App {
    pub screen: AppScreen,
    pub drill: Option<DrillSession>,
    pub daily: Option<DailyProblemSession>,
    pub menu: Menu<'static>,
    pub theme: &'static Theme,
    pub config: Config,
    pub should_quit: bool,
    pub tick_count: u64,
    ledger: ScoreLedger,
    store: Box<dyn ScoreStore>,
    fetcher: StoryFetcher,
    next_session: u64,
    rng: SmallRng,
}

impl App {
    pub fn new(
        config: Config,
        theme: &'static Theme,
        store: Box<dyn ScoreStore>,
        fetcher: StoryFetcher,
    ) -> Self {
        let ledger = ScoreLedger::new(store.read());
        let mut menu = Menu::new(theme);
        menu.total_score = ledger.total();
        info!(total = ledger.total(), online = fetcher.is_configured(), "starting");

        Self {
            screen: AppScreen::Menu,
            drill: None,
            daily: None,
            menu,
            theme,
            config,
            should_quit: false,
            tick_count: 0,
            ledger,
            store,
            fetcher,
            next_session: 0,
            rng: SmallRng::from_entropy(),
        }
    }

    pub fn total_score(&self) -> u64 {
        self.ledger.total()
    }

    fn report_score(&mut self, delta: i64) {
        let total = self.ledger.apply(delta);
        self.menu.total_score = total;
        if let Err(err) = self.store.write(total) {
            warn!(error = %err, total, "failed to persist score");
        }
        debug!(delta, total, "score updated");
    }

    fn new_session_id(&mut self) -> SessionId {
        self.next_session += 1;
        SessionId(self.next_session)
    }

    pub fn select(&mut self, action: MenuAction) {
        match action {
            MenuAction::Drill(mode) => self.start_drill(mode),
            MenuAction::Daily => self.start_daily(),
        }
    }

    pub fn start_drill(&mut self, mode: Mode) {
        info!(mode = mode.title(), "starting drill");
        self.daily = None;
        self.drill = Some(DrillSession::new(mode, &mut self.rng));
        self.screen = AppScreen::Drill;
    }

    pub fn start_daily(&mut self) {
        info!("starting daily problem");
        let id = self.new_session_id();
        self.drill = None;
        self.daily = Some(DailyProblemSession::new(id));
        self.screen = AppScreen::Daily;
        self.fetcher.request_problem(id);
    }

    /// Leaving a screen drops its session, which also drops any pending
    /// drill transition and orphans any in-flight story request.
    pub fn go_to_menu(&mut self) {
        self.drill = None;
        self.daily = None;
        self.screen = AppScreen::Menu;
    }

    pub fn type_char(&mut self, ch: char) {
        match self.screen {
            AppScreen::Drill => {
                if let Some(ref mut drill) = self.drill {
                    drill.type_char(ch);
                }
            }
            AppScreen::Daily => {
                if let Some(ref mut daily) = self.daily {
                    daily.type_char(ch);
                }
            }
            AppScreen::Menu => {}
        }
    }

    pub fn backspace(&mut self) {
        match self.screen {
            AppScreen::Drill => {
                if let Some(ref mut drill) = self.drill {
                    drill.backspace();
                }
            }
            AppScreen::Daily => {
                if let Some(ref mut daily) = self.daily {
                    daily.backspace();
                }
            }
            AppScreen::Menu => {}
        }
    }

    pub fn submit(&mut self, now: Instant) {
        let delta = match self.screen {
            AppScreen::Drill => self.drill.as_mut().and_then(|d| d.submit(now)),
            AppScreen::Daily => self.daily.as_mut().and_then(|d| d.submit()),
            AppScreen::Menu => None,
        };
        if let Some(delta) = delta {
            self.report_score(delta);
        }
    }

    pub fn request_explanation(&mut self) {
        let Some(ref mut daily) = self.daily else {
            return;
        };
        if let Some(request) = daily.request_explanation() {
            self.fetcher.request_explanation(
                daily.id(),
                request.problem_statement,
                request.wrong_answer,
            );
        }
    }

    pub fn retry_daily_load(&mut self) {
        let Some(ref mut daily) = self.daily else {
            return;
        };
        if daily.retry_load() {
            info!("retrying daily problem");
            self.fetcher.request_problem(daily.id());
        }
    }

    pub fn on_tick(&mut self, now: Instant) {
        self.tick_count = self.tick_count.wrapping_add(1);
        if let Some(ref mut drill) = self.drill {
            drill.tick(now, &mut self.rng);
        }
    }

    pub fn handle_story_reply(&mut self, reply: StoryReply) {
        let Some(ref mut daily) = self.daily else {
            debug!(session = ?reply.session, "dropping reply, no daily session");
            return;
        };
        if daily.id() != reply.session {
            debug!(session = ?reply.session, current = ?daily.id(), "dropping stale reply");
            return;
        }
        match reply.payload {
            StoryPayload::Problem(result) => {
                if let Err(ref err) = result {
                    warn!(error = %err, "daily problem unavailable, showing fallback");
                }
                daily.on_problem_loaded(result);
            }
            StoryPayload::Explanation(text) => {
                daily.on_explanation(text);
            }
        }
    }
}
