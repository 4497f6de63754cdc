//! Which question cards are visible, and the navigation bar state.
//!
//! Cards are addressed by their 1-based position in the quiz.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// One card at a time, paged with prev/next.
    #[default]
    Single,
    /// Every card visible at once.
    All,
}

/// The on-screen control that asked for a mode change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeButton {
    Single,
    All,
}

impl From<Mode> for ModeButton {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Single => ModeButton::Single,
            Mode::All => ModeButton::All,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Card {
    pub active: bool,
    pub layout: Mode,
}

/// Snapshot the navigation bar is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavInfo {
    pub current: usize,
    pub total: usize,
    pub prev_disabled: bool,
    pub next_disabled: bool,
    /// Grid entry shown as current.
    pub highlighted: usize,
}

impl NavInfo {
    pub fn label(&self) -> String {
        format!("{} / {}", self.current, self.total)
    }
}

#[derive(Debug, Clone)]
pub struct Navigator {
    mode: Mode,
    current: usize,
    cards: Vec<Card>,
    active_button: ModeButton,
    grid_single_mode: bool,
    scroll_request: Option<usize>,
    info: NavInfo,
}

impl Navigator {
    pub fn new(total: usize) -> Self {
        let cards = (1..=total)
            .map(|i| Card {
                active: i == 1,
                layout: Mode::Single,
            })
            .collect();
        let mut nav = Self {
            mode: Mode::Single,
            current: 1,
            cards,
            active_button: ModeButton::Single,
            grid_single_mode: true,
            scroll_request: None,
            info: NavInfo::default(),
        };
        nav.render_info();
        nav
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn total(&self) -> usize {
        self.cards.len()
    }

    pub fn info(&self) -> NavInfo {
        self.info
    }

    pub fn active_button(&self) -> ModeButton {
        self.active_button
    }

    /// Whether the per-question grid is laid out for single mode.
    pub fn grid_single_mode(&self) -> bool {
        self.grid_single_mode
    }

    pub fn card(&self, index: usize) -> Option<&Card> {
        index.checked_sub(1).and_then(|i| self.cards.get(i))
    }

    pub fn is_active(&self, index: usize) -> bool {
        self.card(index).map(|c| c.active).unwrap_or(false)
    }

    pub fn active_indices(&self) -> Vec<usize> {
        self.cards
            .iter()
            .enumerate()
            .filter(|(_, c)| c.active)
            .map(|(i, _)| i + 1)
            .collect()
    }

    /// Card the view should scroll to, if one was requested since the last call.
    pub fn take_scroll_request(&mut self) -> Option<usize> {
        self.scroll_request.take()
    }

    /// Show card `index` alone. Indexes outside `1..=total` are ignored.
    pub fn go_to_question(&mut self, index: usize) {
        if self.card(index).is_none() {
            return;
        }
        for card in &mut self.cards {
            card.active = false;
        }
        self.cards[index - 1].active = true;
        self.current = index;
        self.render_info();
        self.scroll_request = Some(index);
    }

    pub fn prev_question(&mut self) {
        if self.current > 1 {
            self.go_to_question(self.current - 1);
        }
    }

    pub fn next_question(&mut self) {
        if self.current < self.total() {
            self.go_to_question(self.current + 1);
        }
    }

    /// Switching to the mode already shown leaves the same end state.
    pub fn switch_mode(&mut self, mode: Mode, trigger: ModeButton) {
        self.mode = mode;
        self.active_button = trigger;

        match mode {
            Mode::All => {
                for card in &mut self.cards {
                    card.layout = Mode::All;
                    card.active = true;
                }
                self.grid_single_mode = false;
            }
            Mode::Single => {
                for card in &mut self.cards {
                    card.layout = Mode::Single;
                    card.active = false;
                }
                self.go_to_question(self.current);
                self.grid_single_mode = true;
            }
        }
    }

    fn render_info(&mut self) {
        let total = self.total();
        self.info = NavInfo {
            current: self.current,
            total,
            prev_disabled: self.current == 1,
            next_disabled: self.current == total,
            highlighted: self.current,
        };
    }
}
