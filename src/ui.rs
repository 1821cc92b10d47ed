use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};

use crate::engine::RenderModel;

const HORIZONTAL_MARGIN: u16 = 2;
const VERTICAL_MARGIN: u16 = 1;

/// Text overlay for one frame of the game
#[derive(Debug, Clone)]
pub struct Overlay {
    pub model: RenderModel,
    /// Describes where hands come from, shown under the instructions
    pub source: String,
}

impl Overlay {
    pub fn new(model: RenderModel, source: impl Into<String>) -> Self {
        Self {
            model,
            source: source.into(),
        }
    }

    fn game_lines(&self) -> Vec<Line<'static>> {
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let green_bold_style = bold_style.fg(Color::Green);
        let yellow_bold_style = bold_style.fg(Color::Yellow);
        let red_bold_style = bold_style.fg(Color::Red);

        let mut lines = vec![Line::from(Span::styled(
            "Rock Paper Scissors",
            bold_style.add_modifier(Modifier::UNDERLINED),
        ))];

        if let Some(n) = self.model.countdown_display {
            lines.push(Line::from(Span::styled(
                format!("Countdown: {}", n),
                green_bold_style,
            )));
        }
        if let Some(player) = self.model.player_move {
            lines.push(Line::from(Span::styled(
                format!("Player: {}", player),
                green_bold_style,
            )));
        }
        if let Some(ai) = self.model.ai_move {
            lines.push(Line::from(Span::styled(
                format!("AI: {}", ai),
                yellow_bold_style,
            )));
        }
        if let Some(outcome) = self.model.outcome {
            lines.push(Line::from(Span::styled(
                format!("Result: {}", outcome),
                red_bold_style,
            )));
        }

        lines
    }
}

impl Widget for &Overlay {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([Constraint::Min(1), Constraint::Length(2)])
            .split(area);

        Paragraph::new(self.game_lines())
            .wrap(Wrap { trim: true })
            .render(chunks[0], buf);

        let dim_style = Style::default().add_modifier(Modifier::DIM);
        Paragraph::new(vec![
            Line::from(self.model.instructions()),
            Line::from(Span::styled(self.source.clone(), dim_style)),
        ])
        .alignment(Alignment::Left)
        .render(chunks[1], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Outcome;
    use crate::gesture::Move;

    fn rendered(overlay: &Overlay) -> String {
        let area = Rect::new(0, 0, 60, 12);
        let mut buf = Buffer::empty(area);
        overlay.render(area, &mut buf);
        buf.content
            .chunks(area.width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn model() -> RenderModel {
        RenderModel {
            countdown_display: None,
            player_move: None,
            ai_move: None,
            outcome: None,
            active: false,
        }
    }

    #[test]
    fn idle_overlay_only_shows_instructions() {
        let text = rendered(&Overlay::new(model(), "Hand: none"));
        assert!(text.contains("Press 's' to start game, 'q' to quit"));
        assert!(text.contains("Hand: none"));
        assert!(!text.contains("Countdown"));
        assert!(!text.contains("Result"));
    }

    #[test]
    fn countdown_is_shown_while_counting() {
        let overlay = Overlay::new(
            RenderModel {
                countdown_display: Some(2),
                active: true,
                ..model()
            },
            "",
        );
        let text = rendered(&overlay);
        assert!(text.contains("Countdown: 2"));
        assert!(text.contains("to stop game"));
    }

    #[test]
    fn resolved_round_lists_moves_and_result() {
        let overlay = Overlay::new(
            RenderModel {
                player_move: Some(Move::Rock),
                ai_move: Some(Move::Scissors),
                outcome: Some(Outcome::Win),
                active: true,
                ..model()
            },
            "",
        );
        let text = rendered(&overlay);
        assert!(text.contains("Player: Rock"));
        assert!(text.contains("AI: Scissors"));
        assert!(text.contains("Result: Win"));
    }

    #[test]
    fn missing_hand_result_has_no_moves() {
        let overlay = Overlay::new(
            RenderModel {
                outcome: Some(Outcome::NoHandDetected),
                active: true,
                ..model()
            },
            "",
        );
        let text = rendered(&overlay);
        assert!(text.contains("Result: No hand detected"));
        assert!(!text.contains("Player:"));
    }
}
