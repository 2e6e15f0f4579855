//! The six-section plan view, shared by the TUI and `maintplan organize`.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use maintplan_core::plan::OrganizedPlan;
use maintplan_core::status::StatusIndicator;

/// Section titles, in display order.
pub const SECTION_TITLES: [&str; 6] = [
    "Event Details",
    "Planning & Logistics",
    "Safety Documentation (DC-85)",
    "Volunteer Documents",
    "Volunteers",
    "Required PPE",
];

const BLANK: &str = "—";
const NONE_LISTED: &str = "none listed";

fn heading(title: &'static str) -> Line<'static> {
    Line::from(Span::styled(
        format!("▌ {title}"),
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    ))
}

fn field(label: &'static str, value: &str) -> Line<'static> {
    let value = value.trim();
    Line::from(vec![
        Span::styled(
            format!("  {label}: "),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        if value.is_empty() {
            Span::styled(BLANK, Style::default().fg(Color::DarkGray))
        } else {
            Span::raw(value.to_string())
        },
    ])
}

fn none_listed() -> Line<'static> {
    Line::from(Span::styled(
        format!("  {NONE_LISTED}"),
        Style::default().fg(Color::DarkGray),
    ))
}

fn indicator_span(status: &str) -> Span<'static> {
    match StatusIndicator::from_status(status) {
        Some(indicator) => {
            let color = match indicator {
                StatusIndicator::Done => Color::Green,
                StatusIndicator::Pending => Color::Yellow,
                StatusIndicator::NotStarted => Color::Gray,
            };
            Span::styled(indicator.glyph(), Style::default().fg(color))
        }
        None => Span::raw(" "),
    }
}

/// Render the plan as styled lines, one block per section.
pub fn plan_lines(plan: &OrganizedPlan) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    // Event details.
    lines.push(heading(SECTION_TITLES[0]));
    lines.push(field("Date", &plan.event_details.date));
    lines.push(field("Time", &plan.event_details.time));
    lines.push(field("Services", &plan.event_details.services));
    lines.push(Line::default());

    // Planning.
    lines.push(heading(SECTION_TITLES[1]));
    if plan.planning.is_empty() {
        lines.push(none_listed());
    }
    for item in &plan.planning {
        let mut spans = vec![
            Span::raw("  "),
            indicator_span(&item.status),
            Span::raw(" "),
            Span::raw(item.task.clone()),
        ];
        if let Some(who) = item.responsible() {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(
                format!("({who})"),
                Style::default().fg(Color::Cyan),
            ));
        }
        lines.push(Line::from(spans));
    }
    lines.push(Line::default());

    // Safety.
    let dc85 = &plan.safety.dc85;
    lines.push(heading(SECTION_TITLES[2]));
    lines.push(field("Preparation", &dc85.preparation_by));
    lines.push(field("Submission Deadline", &dc85.deadline));
    lines.push(field("Safety Officer", &dc85.safety_responsible));
    lines.push(Line::default());

    // Documents.
    lines.push(heading(SECTION_TITLES[3]));
    if plan.documents.is_empty() {
        lines.push(none_listed());
    }
    for doc in &plan.documents {
        lines.push(Line::from(format!("  • {doc}")));
    }
    lines.push(Line::default());

    // Volunteers, as badges on one line.
    lines.push(heading(SECTION_TITLES[4]));
    if plan.volunteers.is_empty() {
        lines.push(none_listed());
    } else {
        let mut spans = vec![Span::raw("  ")];
        for (i, name) in plan.volunteers.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" "));
            }
            spans.push(Span::styled(
                format!("[ {name} ]"),
                Style::default().fg(Color::White).bg(Color::Indexed(54)),
            ));
        }
        lines.push(Line::from(spans));
    }
    lines.push(Line::default());

    // PPE, numbered.
    lines.push(heading(SECTION_TITLES[5]));
    if plan.ppe.is_empty() {
        lines.push(none_listed());
    }
    for (i, item) in plan.ppe.iter().enumerate() {
        lines.push(Line::from(format!("  {}. {item}", i + 1)));
    }

    lines
}

/// Flatten styled lines to plain text.
pub fn to_plain_text(lines: &[Line<'_>]) -> String {
    lines
        .iter()
        .map(|line| {
            line.spans
                .iter()
                .map(|s| s.content.as_ref())
                .collect::<String>()
                .trim_end()
                .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use maintplan_core::plan::{EventDetails, PlanningItem, Safety};
    use maintplan_test_utils::sample_plan;

    fn render(plan: &OrganizedPlan) -> String {
        to_plain_text(&plan_lines(plan))
    }

    fn empty_plan() -> OrganizedPlan {
        OrganizedPlan {
            event_details: EventDetails::default(),
            planning: vec![],
            safety: Safety::default(),
            volunteers: vec![],
            documents: vec![],
            ppe: vec![],
        }
    }

    #[test]
    fn sections_appear_in_fixed_order() {
        let text = render(&sample_plan());
        let positions: Vec<usize> = SECTION_TITLES
            .iter()
            .map(|t| text.find(t).unwrap_or_else(|| panic!("missing section {t}")))
            .collect();
        let mut sorted = positions.clone();
        sorted.sort_unstable();
        assert_eq!(positions, sorted);
    }

    #[test]
    fn event_scenario_renders_date_time_and_badges_in_order() {
        let mut plan = sample_plan();
        plan.event_details.date = "17/01".to_string();
        plan.event_details.time = "8h".to_string();
        plan.volunteers = vec!["Ricardo".to_string(), "Jonatas".to_string()];

        let text = render(&plan);
        assert!(text.contains("Date: 17/01"), "{text}");
        assert!(text.contains("Time: 8h"), "{text}");
        assert!(text.contains("[ Ricardo ] [ Jonatas ]"), "{text}");
        assert_eq!(text.matches("[ ").count(), 2);
    }

    #[test]
    fn planning_rows_show_indicator_task_and_owner() {
        let text = render(&sample_plan());
        assert!(text.contains("● Ladder"), "{text}");
        assert!(text.contains("✔ Scaffold rental  (Eduardo)"), "{text}");
    }

    #[test]
    fn unknown_status_renders_without_indicator() {
        let mut plan = empty_plan();
        plan.planning.push(PlanningItem {
            task: "Buy screws".to_string(),
            status: "In progress".to_string(),
            responsible: None,
        });
        let text = render(&plan);
        assert!(text.contains("    Buy screws"), "{text}");
        assert!(!text.contains('✔') && !text.contains('●') && !text.contains('○'));
    }

    #[test]
    fn ppe_is_numbered_in_order() {
        let text = render(&sample_plan());
        assert!(text.contains("1. Safety footwear"), "{text}");
        assert!(text.contains("2. Helmet"), "{text}");
        assert!(text.contains("8. Knitted or leather gloves"), "{text}");
    }

    #[test]
    fn safety_fields_are_labelled() {
        let text = render(&sample_plan());
        assert!(text.contains("Preparation: Jonatas"));
        assert!(text.contains("Submission Deadline: 12/01"));
        assert!(text.contains("Safety Officer: Jonatas"));
    }

    #[test]
    fn empty_fields_and_lists_render_placeholders() {
        let text = render(&empty_plan());
        assert!(text.contains("Date: —"), "{text}");
        assert!(text.contains("Safety Officer: —"), "{text}");
        assert_eq!(text.matches(NONE_LISTED).count(), 4);
    }
}
