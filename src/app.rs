use std::collections::VecDeque;
use std::sync::mpsc::Sender;

use crossterm::event::{KeyCode, KeyEvent};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::ledger::{LedgerAggregate, LedgerError, ResultRecord};
use crate::payout::{NarrativeFlags, PayoutBreakdown};
use crate::session::{SessionError, SessionState};
use crate::wheel::{MULTIPLIERS, SpinOutcome};

const MAX_MESSAGES: usize = 5;
const MAX_NOTE_LEN: usize = 120;
/// Wheel animation length in UI ticks (200ms each).
const SPIN_TICKS: u32 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaneFocus {
    Roll,
    Wheel,
    Tiers,
}

impl PaneFocus {
    fn next(self) -> Self {
        match self {
            PaneFocus::Roll => PaneFocus::Wheel,
            PaneFocus::Wheel => PaneFocus::Tiers,
            PaneFocus::Tiers => PaneFocus::Roll,
        }
    }

    fn prev(self) -> Self {
        match self {
            PaneFocus::Roll => PaneFocus::Tiers,
            PaneFocus::Wheel => PaneFocus::Roll,
            PaneFocus::Tiers => PaneFocus::Wheel,
        }
    }
}

/// Work shipped to the ledger thread; every command is a single attempt.
pub enum LedgerCmd {
    Refresh,
    Save(ResultRecord),
}

/// Replies from the ledger thread. `Saved(Ok(None))` means the append
/// succeeded but the follow-up aggregate fetch did not.
pub enum LedgerReply {
    Refreshed(Result<LedgerAggregate, LedgerError>),
    Saved(Result<Option<LedgerAggregate>, LedgerError>),
}

pub struct SpinAnimation {
    pub outcome: SpinOutcome,
    pub ticks_left: u32,
}

pub struct App {
    pub focus: PaneFocus,
    pub should_quit: bool,
    pub session: SessionState,
    pub roll: i64,
    pub flags: NarrativeFlags,
    pub note: String,
    pub editing_note: bool,
    pub show_tiers: bool,
    pub tier_scroll: usize,
    pub status: String,
    pub messages: VecDeque<String>,
    pub animation: Option<SpinAnimation>,
    pub save_in_flight: bool,
    ledger_ok: bool,
    ledger_tx: Sender<LedgerCmd>,
    rng: StdRng,
}

impl App {
    /// `ledger_error` carries the startup config/connection failure, if
    /// any. With a working ledger the first aggregate refresh is requested
    /// here and lands asynchronously after the first render.
    pub fn new(ledger_tx: Sender<LedgerCmd>, ledger_error: Option<String>) -> Self {
        let ledger_ok = ledger_error.is_none();
        let status = match &ledger_error {
            Some(err) => format!("❌ {err}"),
            None => "Connecting to ledger…".to_string(),
        };
        if ledger_ok {
            let _ = ledger_tx.send(LedgerCmd::Refresh);
        }
        Self {
            focus: PaneFocus::Roll,
            should_quit: false,
            session: SessionState::new(None),
            roll: 15,
            flags: NarrativeFlags::default(),
            note: String::new(),
            editing_note: false,
            show_tiers: false,
            tier_scroll: 0,
            status,
            messages: VecDeque::new(),
            animation: None,
            save_in_flight: false,
            ledger_ok,
            ledger_tx,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn breakdown(&self) -> PayoutBreakdown {
        self.session.compute_payout(self.roll, self.flags)
    }

    /// Segment the wheel pointer sits on right now. Cycles backwards two
    /// segments per tick while spinning so the countdown settles exactly
    /// on the drawn index.
    pub fn wheel_pointer(&self) -> Option<usize> {
        match &self.animation {
            Some(anim) => {
                let offset = anim.ticks_left as usize * 2;
                Some((anim.outcome.index + offset) % MULTIPLIERS.len())
            }
            None => self.session.selected_index(),
        }
    }

    pub fn on_tick(&mut self) {
        if let Some(anim) = &mut self.animation {
            anim.ticks_left -= 1;
            if anim.ticks_left == 0 {
                let outcome = anim.outcome;
                self.animation = None;
                self.push_message(format!(
                    "Wheel landed on {}",
                    format_multiplier(outcome.multiplier())
                ));
            }
        }
    }

    fn push_message(&mut self, msg: impl Into<String>) {
        self.messages.push_front(msg.into());
        while self.messages.len() > MAX_MESSAGES {
            self.messages.pop_back();
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        if self.editing_note {
            self.handle_note_input(key);
            return;
        }
        if matches!(key.code, KeyCode::Char('q' | 'Q')) {
            self.should_quit = true;
            return;
        }

        match key.code {
            KeyCode::Tab => {
                self.focus = self.focus.next();
            }
            KeyCode::BackTab => {
                self.focus = self.focus.prev();
            }
            _ => match self.focus {
                PaneFocus::Roll => self.handle_roll_input(key),
                PaneFocus::Wheel => self.handle_wheel_input(key),
                PaneFocus::Tiers => self.handle_tiers_input(key),
            },
        }
    }

    fn handle_note_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter | KeyCode::Esc => {
                self.editing_note = false;
            }
            KeyCode::Backspace => {
                self.note.pop();
            }
            KeyCode::Char(c) => {
                if self.note.len() < MAX_NOTE_LEN {
                    self.note.push(c);
                }
            }
            _ => {}
        }
    }

    fn handle_roll_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Left | KeyCode::Down => {
                self.roll = (self.roll - 1).max(1);
            }
            KeyCode::Right | KeyCode::Up => {
                self.roll = (self.roll + 1).min(30);
            }
            KeyCode::Char('1') => self.flags.passable = !self.flags.passable,
            KeyCode::Char('2') => self.flags.good = !self.flags.good,
            KeyCode::Char('3') => self.flags.excellent = !self.flags.excellent,
            KeyCode::Char('n' | 'N') => {
                self.editing_note = true;
            }
            KeyCode::Char('s' | 'S') => self.handle_save(),
            _ => {}
        }
    }

    fn handle_wheel_input(&mut self, key: KeyEvent) {
        if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
            let outcome = self.session.spin(&mut self.rng);
            self.animation = Some(SpinAnimation {
                outcome,
                ticks_left: SPIN_TICKS,
            });
        }
    }

    fn handle_tiers_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                self.show_tiers = !self.show_tiers;
                self.tier_scroll = 0;
            }
            KeyCode::Up => {
                self.tier_scroll = self.tier_scroll.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.show_tiers && self.tier_scroll + 1 < crate::reputation::TIER_NAMES.len() {
                    self.tier_scroll += 1;
                }
            }
            _ => {}
        }
    }

    fn handle_save(&mut self) {
        if self.save_in_flight {
            self.push_message("A save is already in flight.");
            return;
        }
        let record = match self.session.prepare_record(self.roll, self.flags, &self.note) {
            Ok(record) => record,
            Err(SessionError::InvalidState) => {
                self.push_message("Spin the wheel before saving.");
                return;
            }
            Err(err) => {
                self.push_message(format!("Save failed: {err}"));
                return;
            }
        };
        if !self.ledger_ok {
            self.push_message("Ledger not configured; result not saved.");
            return;
        }
        self.save_in_flight = true;
        self.status = "Saving result…".to_string();
        let _ = self.ledger_tx.send(LedgerCmd::Save(record));
    }

    pub fn on_ledger(&mut self, reply: LedgerReply) {
        match reply {
            LedgerReply::Refreshed(Ok(aggregate)) => {
                self.session.apply_aggregate(aggregate);
                self.status = "✅ Connected to ledger".to_string();
            }
            LedgerReply::Refreshed(Err(err)) => {
                self.status = format!("❌ {err}");
            }
            LedgerReply::Saved(Ok(refreshed)) => {
                self.save_in_flight = false;
                self.status = "✅ Saved to ledger".to_string();
                match refreshed {
                    Some(aggregate) => {
                        self.session.apply_aggregate(aggregate);
                        self.push_message("Result saved to ledger.");
                    }
                    None => {
                        self.push_message("Result saved; totals refresh failed.");
                    }
                }
            }
            LedgerReply::Saved(Err(err)) => {
                self.save_in_flight = false;
                self.status = format!("❌ {err}");
                self.push_message(format!("Save failed: {err}"));
            }
        }
    }
}

pub fn format_multiplier(mult: f64) -> String {
    if mult.fract() == 0.0 {
        format!("×{mult:.1}")
    } else {
        format!("×{mult}")
    }
}

pub fn format_gold(total: f64) -> String {
    format!("{} gp", total.round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, KeyEventState, KeyModifiers};
    use std::sync::mpsc;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn test_app() -> App {
        let (tx, _rx) = mpsc::channel();
        App::new(tx, Some("ledger not configured: test".into()))
    }

    #[test]
    fn save_before_spin_warns_instead_of_sending() {
        let mut app = test_app();
        app.on_key(key(KeyCode::Char('s')));
        assert_eq!(
            app.messages.front().unwrap(),
            "Spin the wheel before saving."
        );
        assert!(!app.save_in_flight);
    }

    #[test]
    fn pointer_settles_on_the_drawn_segment() {
        let mut app = test_app();
        app.focus = PaneFocus::Wheel;
        app.on_key(key(KeyCode::Enter));
        let drawn = app.session.selected_index().unwrap();
        for _ in 0..SPIN_TICKS {
            app.on_tick();
        }
        assert!(app.animation.is_none());
        assert_eq!(app.wheel_pointer(), Some(drawn));
    }

    #[test]
    fn roll_stays_on_the_d30() {
        let mut app = test_app();
        for _ in 0..40 {
            app.on_key(key(KeyCode::Left));
        }
        assert_eq!(app.roll, 1);
        for _ in 0..40 {
            app.on_key(key(KeyCode::Right));
        }
        assert_eq!(app.roll, 30);
    }

    #[test]
    fn note_mode_captures_text_until_enter() {
        let mut app = test_app();
        app.on_key(key(KeyCode::Char('n')));
        for c in "rug job".chars() {
            app.on_key(key(KeyCode::Char(c)));
        }
        app.on_key(key(KeyCode::Enter));
        assert!(!app.editing_note);
        assert_eq!(app.note, "rug job");
    }

    #[test]
    fn multiplier_labels_match_the_wheel_face() {
        assert_eq!(format_multiplier(1.0), "×1.0");
        assert_eq!(format_multiplier(0.8), "×0.8");
        assert_eq!(format_multiplier(1.15), "×1.15");
    }
}
