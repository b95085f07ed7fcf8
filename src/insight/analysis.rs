use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{parse_due_date, Task};

/// Completion rate as a percentage rounded to one decimal place.
pub fn completion_rate(completed: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let rate = completed as f64 / total as f64 * 100.0;
    (rate * 10.0).round() / 10.0
}

pub fn count_overdue(tasks: &[Task], now: DateTime<Utc>) -> usize {
    tasks
        .iter()
        .filter(|task| !task.completed)
        .filter_map(|task| task.due_datetime())
        .filter(|due| *due < now)
        .count()
}

/// Per-user task statistics rendered on the profile page.
#[derive(Debug, Serialize)]
pub struct TaskStats {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub pending_tasks: usize,
    pub completion_rate: f64,
}

impl TaskStats {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let total_tasks = tasks.len();
        let completed_tasks = tasks.iter().filter(|task| task.completed).count();
        Self {
            total_tasks,
            completed_tasks,
            pending_tasks: total_tasks - completed_tasks,
            completion_rate: completion_rate(completed_tasks, total_tasks),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TaskAnalysis {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub overdue_tasks: usize,
    pub completion_rate: f64,
    pub insights: Vec<String>,
}

/// Analysis for the HTTP endpoint: counts plus tiered insight strings.
pub fn analyze(tasks: &[Task], username: &str, now: DateTime<Utc>) -> TaskAnalysis {
    let stats = TaskStats::from_tasks(tasks);
    let overdue = count_overdue(tasks, now);

    let mut insights = vec![tier_insight(stats.completion_rate, username)];
    if overdue > 0 {
        insights.push(format!(
            "🌅 Gentle Reminder for {}: {} tasks are waiting like shells on the shore.",
            username, overdue
        ));
    }

    TaskAnalysis {
        total_tasks: stats.total_tasks,
        completed_tasks: stats.completed_tasks,
        overdue_tasks: overdue,
        completion_rate: stats.completion_rate,
        insights,
    }
}

fn tier_insight(rate: f64, username: &str) -> String {
    if rate >= 80.0 {
        format!(
            "🌟 Excellent Flow, {}! You're riding the productivity wave like a pro surfer!",
            username
        )
    } else if rate >= 60.0 {
        format!(
            "🌊 Steady Progress, {}! Like consistent ocean waves, you're making good progress.",
            username
        )
    } else if rate >= 40.0 {
        format!(
            "🐚 Building Momentum, {}! Every shell starts rough before becoming smooth.",
            username
        )
    } else {
        format!(
            "🏖️ Fresh Start Opportunity, {}! Like a clean beach at dawn, you have beautiful potential!",
            username
        )
    }
}

/// Task shape accepted by the `analyze_task_patterns` tool. Deliberately
/// lenient: callers hand over whatever task objects they hold and absent
/// fields default.
#[derive(Debug, Default, Deserialize)]
pub struct PatternInput {
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub due_date: Option<String>,
}

/// Render the pattern analysis report served by the tool-calling service.
pub fn render_patterns(tasks: &[PatternInput], now: DateTime<Utc>) -> String {
    let total = tasks.len();
    let completed = tasks.iter().filter(|task| task.completed).count();
    let overdue = tasks
        .iter()
        .filter(|task| !task.completed)
        .filter_map(|task| task.due_date.as_deref().and_then(parse_due_date))
        .filter(|due| *due < now)
        .count();
    let rate = completion_rate(completed, total);

    let mut report = String::from("🌊 **Ocean Tasks Analysis** 🌊\n\n");
    report.push_str("📊 **Task Overview:**\n");
    report.push_str(&format!("• Total tasks: {} 🐚\n", total));
    report.push_str(&format!("• Completed: {} ⭐\n", completed));
    report.push_str(&format!("• Completion rate: {:.1}% 🌊\n", rate));
    report.push_str(&format!("• Overdue tasks: {} 🏖️\n\n", overdue));

    report.push_str(if rate >= 80.0 {
        "🌟 **Excellent Flow!** You're riding the productivity wave like a pro surfer! Keep up this amazing momentum!"
    } else if rate >= 60.0 {
        "🌊 **Steady Progress!** Like consistent ocean waves, you're making good progress. A few more completed tasks and you'll be in the flow zone!"
    } else if rate >= 40.0 {
        "🐚 **Building Momentum!** Every shell starts rough before becoming smooth. You're on the right path - keep collecting those completed tasks!"
    } else {
        "🏖️ **Fresh Start Opportunity!** Like a clean beach at dawn, you have a beautiful opportunity to create new patterns. Start with one small task - your first seashell!"
    });

    if overdue > 0 {
        report.push_str(&format!(
            "\n\n🌅 **Gentle Reminder:** {} tasks are waiting like shells on the shore. Consider tackling the smallest one first to build momentum!",
            overdue
        ));
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Task;
    use chrono::TimeZone;

    fn task(completed: bool, due_date: Option<&str>) -> Task {
        let mut task = Task::new(
            "alice".to_string(),
            "t".to_string(),
            String::new(),
            due_date.map(str::to_string),
        );
        task.completed = completed;
        task
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_completion_rate_rounds_to_one_decimal() {
        assert_eq!(completion_rate(0, 0), 0.0);
        assert_eq!(completion_rate(1, 3), 33.3);
        assert_eq!(completion_rate(2, 3), 66.7);
        assert_eq!(completion_rate(3, 3), 100.0);
    }

    #[test]
    fn test_count_overdue_skips_completed_and_undated() {
        let tasks = vec![
            task(false, Some("2024-06-01")),  // overdue
            task(true, Some("2024-06-01")),   // completed, not counted
            task(false, Some("2024-07-01")),  // future
            task(false, None),                // no due date
            task(false, Some("not a date")),  // unparseable
        ];
        assert_eq!(count_overdue(&tasks, fixed_now()), 1);
    }

    #[test]
    fn test_stats_from_tasks() {
        let tasks = vec![task(true, None), task(false, None), task(true, None)];
        let stats = TaskStats::from_tasks(&tasks);
        assert_eq!(stats.total_tasks, 3);
        assert_eq!(stats.completed_tasks, 2);
        assert_eq!(stats.pending_tasks, 1);
        assert_eq!(stats.completion_rate, 66.7);
    }

    #[test]
    fn test_analyze_tiers_and_overdue_reminder() {
        let tasks = vec![
            task(true, None),
            task(true, None),
            task(true, None),
            task(true, None),
            task(false, Some("2024-06-01")),
        ];
        let analysis = analyze(&tasks, "alice", fixed_now());
        assert_eq!(analysis.completion_rate, 80.0);
        assert_eq!(analysis.overdue_tasks, 1);
        assert_eq!(analysis.insights.len(), 2);
        assert!(analysis.insights[0].contains("Excellent Flow, alice"));
        assert!(analysis.insights[1].contains("1 tasks are waiting"));
    }

    #[test]
    fn test_render_patterns_report() {
        let inputs: Vec<PatternInput> = serde_json::from_str(
            r#"[
                {"id": "t1", "title": "a", "completed": true},
                {"title": "b", "due_date": "2024-06-01"},
                {"title": "c"}
            ]"#,
        )
        .unwrap();
        let report = render_patterns(&inputs, fixed_now());
        assert!(report.contains("Total tasks: 3"));
        assert!(report.contains("Completed: 1"));
        assert!(report.contains("Completion rate: 33.3%"));
        assert!(report.contains("Overdue tasks: 1"));
        assert!(report.contains("Fresh Start Opportunity"));
        assert!(report.contains("Gentle Reminder"));
    }

    #[test]
    fn test_render_patterns_empty() {
        let report = render_patterns(&[], fixed_now());
        assert!(report.contains("Total tasks: 0"));
        assert!(report.contains("Completion rate: 0.0%"));
    }
}
