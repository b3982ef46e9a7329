//! Main UI Application
//!
//! Terminal dashboard: level, progress bar, completion counters and recent
//! level-ups, with keys to record completed content.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph},
};

use crate::data::{ContentKind, XpRewards};
use crate::progression::{level_title, LevelUpHistory, LevelUpNotifier, LevelingEngine, LogListener};
use crate::save::{save_profile, LearnerProfile};

/// How many level-ups the dashboard remembers
const HISTORY_LEN: usize = 8;

/// Main UI application
pub struct App {
    engine: LevelingEngine,
    rewards: XpRewards,
    profile: LearnerProfile,
    notifier: LevelUpNotifier,
    /// Recent level-ups, fed by the notifier
    history: LevelUpHistory,
    /// Last status line shown at the bottom
    status: String,
    /// Whether the profile changed since the last save
    dirty: bool,
}

impl App {
    pub fn new(engine: LevelingEngine, rewards: XpRewards, profile: LearnerProfile) -> Self {
        let history = LevelUpHistory::new(HISTORY_LEN);
        let mut notifier = LevelUpNotifier::new();
        notifier.subscribe(LogListener);
        notifier.subscribe(history.clone());

        Self {
            engine,
            rewards,
            profile,
            notifier,
            history,
            status: String::from("Press m/q/e to complete content, s to save, Esc to quit"),
            dirty: false,
        }
    }

    pub fn profile(&self) -> &LearnerProfile {
        &self.profile
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Handle a key press. Returns true when the app should quit.
    pub fn handle_input(&mut self, key: KeyEvent) -> Result<bool> {
        match key.code {
            KeyCode::Esc => return Ok(true),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return Ok(true),
            KeyCode::Char('m') => self.complete(ContentKind::Mission)?,
            KeyCode::Char('q') => self.complete(ContentKind::Quest)?,
            KeyCode::Char('e') => self.complete(ContentKind::Expedition)?,
            KeyCode::Char('s') => self.save()?,
            _ => {}
        }
        Ok(false)
    }

    fn complete(&mut self, kind: ContentKind) -> Result<()> {
        let reward = self.rewards.reward_for(kind);
        let level_up = self.profile.complete(kind, &self.rewards, &self.engine, &mut self.notifier)?;
        self.dirty = true;

        self.status = match level_up {
            Some(event) => format!(
                "{} complete! +{} XP. Level up: {} -> {}",
                kind.name(), reward, event.previous_level, event.new_level
            ),
            None => format!("{} complete! +{} XP", kind.name(), reward),
        };
        Ok(())
    }

    /// Write the profile to disk
    pub fn save(&mut self) -> Result<()> {
        save_profile(&self.profile)?;
        self.dirty = false;
        self.status = String::from("Profile saved");
        Ok(())
    }

    pub fn render(&self, frame: &mut Frame) {
        frame.render_widget(Clear, frame.area());

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(6),
                Constraint::Length(3),
            ])
            .split(frame.area());

        self.render_header(frame, chunks[0]);
        self.render_progress(frame, chunks[1]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[2]);
        self.render_stats(frame, body[0]);
        self.render_level_ups(frame, body[1]);

        self.render_status(frame, chunks[3]);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let header = Paragraph::new(Line::from(vec![
            Span::styled(
                format!("Level {}", self.profile.level),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(level_title(self.profile.level), Style::default().fg(Color::Yellow).add_modifier(Modifier::ITALIC)),
            Span::raw("  "),
            Span::styled(format!("{} XP total", self.profile.total_xp), Style::default().fg(Color::Gray)),
        ]))
        .block(Block::default().borders(Borders::ALL).title(" Questline "));

        frame.render_widget(header, area);
    }

    fn render_progress(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Progress ")
            .border_style(Style::default().fg(Color::DarkGray));

        // Bad stored values render as a dash rather than taking the UI down
        let gauge = match self.profile.progress(&self.engine) {
            Ok(progress) => Gauge::default()
                .block(block)
                .gauge_style(Style::default().fg(Color::Green).bg(Color::Black))
                .ratio(progress.percentage / 100.0)
                .label(format!(
                    "{}/{} XP ({:.1}%)",
                    progress.current, progress.required, progress.percentage
                )),
            Err(e) => {
                log::debug!("Cannot render progress: {}", e);
                Gauge::default().block(block).ratio(0.0).label("—")
            }
        };

        frame.render_widget(gauge, area);
    }

    fn render_stats(&self, frame: &mut Frame, area: Rect) {
        let stats = &self.profile.stats;
        let row = |name: &'static str, count: u32, kind: ContentKind| {
            Line::from(vec![
                Span::styled(format!("{:<12}", name), Style::default().fg(Color::Gray)),
                Span::styled(count.to_string(), Style::default().fg(Color::White)),
                Span::styled(
                    format!("  (+{} XP)", self.rewards.reward_for(kind)),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        };

        let lines = vec![
            row("Missions", stats.missions, ContentKind::Mission),
            row("Quests", stats.quests, ContentKind::Quest),
            row("Expeditions", stats.expeditions, ContentKind::Expedition),
            Line::from(""),
            Line::from(vec![
                Span::styled("Next level at ", Style::default().fg(Color::Gray)),
                Span::styled(
                    self.engine
                        .total_xp_for_level(self.profile.level.saturating_add(1))
                        .map(|xp| format!("{} XP", xp))
                        .unwrap_or_else(|_| "—".to_string()),
                    Style::default().fg(Color::Cyan),
                ),
            ]),
        ];

        let block = Block::default().borders(Borders::ALL).title(" Completed ");
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_level_ups(&self, frame: &mut Frame, area: Rect) {
        let recent = self.history.recent();
        let lines: Vec<Line> = if recent.is_empty() {
            vec![Line::from(Span::styled("No level-ups yet", Style::default().fg(Color::DarkGray)))]
        } else {
            recent
                .iter()
                .map(|event| {
                    Line::from(vec![
                        Span::styled(
                            format!("Level {} ", event.new_level),
                            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                        ),
                        Span::styled(
                            format!("({}) at {} XP", level_title(event.new_level), event.total_xp),
                            Style::default().fg(Color::Gray),
                        ),
                    ])
                })
                .collect()
        };

        let block = Block::default().borders(Borders::ALL).title(" Level-ups ");
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let text = if self.dirty {
            format!("{} [unsaved]", self.status)
        } else {
            self.status.clone()
        };
        let status = Paragraph::new(text)
            .style(Style::default().fg(Color::White))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(status, area);
    }
}
