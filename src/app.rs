use ratatui::widgets::ListState;

use crate::api::Devotional;
use crate::home::{HeroCarousel, HomePage};
use crate::loader::PortalMsg;

/// Which page is on screen.
#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Home,
    Devotional(DevotionalView),
}

/// The devotional detail page's own loading state.
#[derive(Debug, Clone, PartialEq)]
pub enum DevotionalView {
    Loading { id: i64 },
    Loaded(Box<Devotional>),
    Failed { id: i64, message: String },
}

/// Network work the app wants the main loop to start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    LoadHome { generation: u64 },
    LoadDevotional { id: i64 },
}

/// Homepage display state behind a single loading gate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HomeState {
    /// True until the current load's [`HomePage`] has been applied.
    pub loading: bool,
    pub page: HomePage,
}

pub struct App {
    pub screen: Screen,
    pub home: HomeState,
    pub hero: HeroCarousel<PortalMsg>,
    /// Selection state for the history timeline.
    pub history_state: ListState,
    /// Whether the user has requested to quit.
    pub quit: bool,
    /// Last status message.
    pub status: String,
    generation: u64,
    requests: Vec<Request>,
}

impl App {
    /// Create the app and queue the first homepage load.
    pub fn new(hero: HeroCarousel<PortalMsg>) -> Self {
        let mut app = Self {
            screen: Screen::Home,
            home: HomeState::default(),
            hero,
            history_state: ListState::default(),
            quit: false,
            status: "Starting…".into(),
            generation: 0,
            requests: Vec::new(),
        };
        app.reload();
        app
    }

    /// Hand pending network requests to the caller.
    pub fn take_requests(&mut self) -> Vec<Request> {
        std::mem::take(&mut self.requests)
    }

    /// Start a fresh homepage load; results of earlier loads are ignored.
    pub fn reload(&mut self) {
        self.generation += 1;
        self.home.loading = true;
        self.status = "Loading…".into();
        self.requests.push(Request::LoadHome {
            generation: self.generation,
        });
    }

    /// Apply one message from the background.
    pub fn apply(&mut self, msg: PortalMsg) {
        match msg {
            PortalMsg::Home { generation, page } => self.apply_home(generation, *page),
            PortalMsg::Devotional { id, result } => self.apply_devotional(id, result),
            PortalMsg::CarouselTick { epoch } => {
                if self.screen == Screen::Home && !self.home.loading {
                    self.hero.tick(epoch);
                }
            }
        }
    }

    fn apply_home(&mut self, generation: u64, page: HomePage) {
        if generation != self.generation {
            return;
        }
        self.hero
            .set_slide_count(page.aggregate.carousel_slides.len());
        if self.screen != Screen::Home {
            self.hero.suspend();
        }
        self.status = format!(
            "{} announcements, {} history entries",
            page.aggregate.announcements.len(),
            page.history.entries.len()
        );
        self.history_state = ListState::default();
        self.home.page = page;
        self.home.loading = false;
    }

    fn apply_devotional(&mut self, id: i64, result: Result<Devotional, String>) {
        let waiting = matches!(
            &self.screen,
            Screen::Devotional(DevotionalView::Loading { id: want }) if *want == id
        );
        if !waiting {
            return;
        }
        self.screen = Screen::Devotional(match result {
            Ok(devotional) => DevotionalView::Loaded(Box::new(devotional)),
            Err(message) => DevotionalView::Failed { id, message },
        });
    }

    // -- pages ---------------------------------------------------------------

    /// Open the detail page for today's devotional, if there is one.
    pub fn open_devotional(&mut self) {
        let id = self
            .home
            .page
            .aggregate
            .devotional
            .as_ref()
            .and_then(|d| d.id);
        match id {
            Some(id) => self.open_devotional_id(id),
            None => self.status = "No devotional to open".into(),
        }
    }

    pub fn open_devotional_id(&mut self, id: i64) {
        self.hero.suspend();
        self.screen = Screen::Devotional(DevotionalView::Loading { id });
        self.requests.push(Request::LoadDevotional { id });
    }

    /// Leave the detail page.
    pub fn back(&mut self) {
        if self.screen != Screen::Home {
            self.screen = Screen::Home;
            self.hero.resume();
        }
    }

    /// `r`: reload the homepage, or refetch a failed devotional.
    pub fn refresh(&mut self) {
        match &self.screen {
            Screen::Home => self.reload(),
            Screen::Devotional(DevotionalView::Failed { id, .. })
            | Screen::Devotional(DevotionalView::Loading { id }) => {
                let id = *id;
                self.open_devotional_id(id);
            }
            Screen::Devotional(DevotionalView::Loaded(devotional)) => {
                if let Some(id) = devotional.id {
                    self.open_devotional_id(id);
                }
            }
        }
    }

    // -- navigation ----------------------------------------------------------

    fn history_len(&self) -> usize {
        self.home.page.history.entries.len()
    }

    pub fn select_next(&mut self) {
        let len = self.history_len();
        if len == 0 {
            return;
        }
        let i = match self.history_state.selected() {
            Some(i) => (i + 1).min(len - 1),
            None => 0,
        };
        self.history_state.select(Some(i));
    }

    pub fn select_previous(&mut self) {
        if self.history_len() == 0 {
            return;
        }
        let i = match self.history_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.history_state.select(Some(i));
    }

    pub fn select_first(&mut self) {
        if self.history_len() > 0 {
            self.history_state.select(Some(0));
        }
    }

    pub fn select_last(&mut self) {
        let len = self.history_len();
        if len > 0 {
            self.history_state.select(Some(len - 1));
        }
    }
}
