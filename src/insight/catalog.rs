use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Name substituted into message templates when no user is known, e.g. when
/// a message is requested through the tool-calling service.
pub const DEFAULT_USERNAME: &str = "Ocean Explorer";

const FALLBACK_MESSAGE: &str =
    "🌊 The ocean whispers: 'Keep flowing forward, one wave at a time!'";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageContext {
    OverdueGentle,
    OverdueEncouraging,
    CompletionCelebration,
    #[default]
    DailyMotivation,
}

impl MessageContext {
    pub fn is_overdue(self) -> bool {
        matches!(self, Self::OverdueGentle | Self::OverdueEncouraging)
    }

    /// The fixed catalog for this context. Entries may carry a `{username}`
    /// placeholder filled in by [`personalize`].
    pub fn messages(self) -> &'static [&'static str] {
        match self {
            Self::OverdueGentle => &[
                "The tide hasn't turned yet, {username} 🌊 — you've still got this!",
                "Every wave begins somewhere, {username}. Take one small step today.",
                "Like shells on the shore, your tasks are waiting to be discovered, {username} 🐚",
                "The ocean is patient, and so are your goals. Keep flowing forward!",
                "Even the mightiest waves start as gentle ripples. You can do this! 🌊",
            ],
            Self::OverdueEncouraging => &[
                "Your productivity is like the tide, {username} - it ebbs and flows. This is your time to flow!",
                "The beach is calling, {username}, but first, let's catch up on these tasks 🏖️",
                "Like a lighthouse guides ships, let your determination guide you back on track, {username} ⚓",
                "The sea never rushes, yet it always reaches its destination. You will too! 🌊",
                "Every seashell was once rough - smooth progress comes with gentle persistence 🐚",
            ],
            Self::CompletionCelebration => &[
                "Fantastic, {username}! You're riding the wave of productivity! 🌊⭐",
                "Like a perfect seashell, your completed task is a treasure, {username}! 🐚✨",
                "You're making waves with your progress, {username}! Keep it flowing! 🌊",
                "Another task washed ashore - beautifully completed! 🏖️⭐",
                "Your focus is as steady as the tide - amazing work! 🌊✨",
            ],
            Self::DailyMotivation => &[
                "Start your day like the sunrise over the ocean, {username} - bright and full of possibility! 🌅",
                "Let your tasks flow like gentle waves, {username} - steady and purposeful 🌊",
                "Today's productivity forecast for {username}: Clear skies and smooth sailing ahead! ⛵",
                "Like the ocean shapes the shore, let today shape your success 🏖️",
                "Dive into your day with the energy of ocean waves! 🌊💪",
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    ProductivityTips,
    FocusTechniques,
}

impl InsightKind {
    pub fn insights(self) -> &'static [&'static str] {
        match self {
            Self::ProductivityTips => &[
                "🌊 Flow Tip: Break large tasks into smaller waves - easier to ride!",
                "🐚 Shell Strategy: Collect small wins throughout the day like seashells on the beach",
                "🏖️ Beach Break: Take regular breaks to maintain your natural rhythm",
                "⭐ Starfish Method: Spread your focus across different task types for balance",
                "🌅 Tide Timing: Tackle your hardest tasks when your energy is at high tide",
            ],
            Self::FocusTechniques => &[
                "🌊 Ocean Breathing: Take deep breaths like ocean waves to center yourself",
                "🐚 Shell Focus: Hold one task in your mind like a precious shell",
                "🏖️ Beach Visualization: Imagine completing tasks as collecting treasures on the beach",
                "⚓ Anchor Technique: Set a clear intention before starting each task",
                "🌊 Wave Momentum: Use the completion of one task to flow into the next",
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    #[default]
    Gentle,
    Encouraging,
    Celebratory,
    Calming,
}

impl Tone {
    pub fn messages(self) -> &'static [&'static str] {
        match self {
            Self::Gentle => &[
                "Like gentle waves lapping the shore, take your time and flow naturally 🌊",
                "The ocean never rushes, yet it shapes the entire coastline. You have time 🏖️",
                "Soft as sea foam, steady as the tide - that's your natural rhythm 🌊",
            ],
            Self::Encouraging => &[
                "You've got the power of the ocean within you - unleash those waves! 🌊💪",
                "Like a lighthouse guides ships safely home, your determination will guide you through! ⚓",
                "Surf's up! Ride this wave of motivation all the way to completion! 🏄‍♀️",
            ],
            Self::Celebratory => &[
                "Fantastic! You're making waves of success! 🌊⭐",
                "Like finding a perfect seashell, this achievement is truly special! 🐚✨",
                "You're absolutely crushing it - the ocean itself is cheering you on! 🌊🎉",
            ],
            Self::Calming => &[
                "Breathe like the ocean waves - in and out, steady and peaceful 🌊😌",
                "Let the rhythm of the sea calm your mind and center your focus 🏖️",
                "Like a quiet lagoon, find your inner peace and clarity 🌊💙",
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeContext {
    Morning,
    Afternoon,
    Evening,
    LateNight,
}

impl TimeContext {
    fn addition(self) -> &'static str {
        match self {
            Self::Morning => {
                "🌅 Morning energy is like the rising tide - use it to lift your productivity!"
            }
            Self::Afternoon => {
                "☀️ Afternoon focus flows like steady ocean currents - consistent and strong!"
            }
            Self::Evening => {
                "🌅 Evening reflection time - like watching sunset over calm waters, review your progress!"
            }
            Self::LateNight => {
                "🌙 Night owl productivity - like bioluminescent waves, you shine in the darkness!"
            }
        }
    }
}

/// Choose one entry from a catalog. Pure over the injected random source so
/// tests can seed it and assert exact output.
pub fn pick<'a, R: Rng + ?Sized>(messages: &'a [&'static str], rng: &mut R) -> &'a str {
    messages.choose(rng).copied().unwrap_or(FALLBACK_MESSAGE)
}

pub fn personalize(template: &str, username: &str) -> String {
    template.replace("{username}", username)
}

fn overdue_suffix(days_overdue: i64) -> Option<String> {
    match days_overdue {
        i64::MIN..=0 => None,
        1 => Some("💙 Just one day behind - like a gentle wave, you can catch up easily!".to_string()),
        2..=3 => Some(format!(
            "🌊 {} days behind, but the ocean teaches us patience. You've got this!",
            days_overdue
        )),
        _ => Some(
            "🏖️ Take it one task at a time, like collecting shells on an endless beach."
                .to_string(),
        ),
    }
}

fn task_count_suffix(task_count: u64) -> Option<String> {
    (task_count > 1).then(|| {
        format!(
            "🐚 {} tasks waiting - like treasures scattered on the shore, each one valuable!",
            task_count
        )
    })
}

/// Full motivational message: a catalog pick plus the overdue and task-count
/// suffixes where they apply.
pub fn motivational_message<R: Rng + ?Sized>(
    context: MessageContext,
    username: &str,
    days_overdue: i64,
    task_count: u64,
    rng: &mut R,
) -> String {
    let mut message = personalize(pick(context.messages(), rng), username);
    if context.is_overdue() {
        if let Some(suffix) = overdue_suffix(days_overdue) {
            message.push_str("\n\n");
            message.push_str(&suffix);
        }
    }
    if let Some(suffix) = task_count_suffix(task_count) {
        message.push_str("\n\n");
        message.push_str(&suffix);
    }
    message
}

pub fn productivity_insight<R: Rng + ?Sized>(
    kind: InsightKind,
    user_context: Option<&str>,
    rng: &mut R,
) -> String {
    let mut insight = pick(kind.insights(), rng).to_string();
    if let Some(context) = user_context.filter(|c| !c.is_empty()) {
        insight.push_str(&format!("\n\n💡 Considering your situation: {}", context));
        insight.push_str(
            "\n🌊 Remember, like the tide, productivity has natural rhythms. Work with yours!",
        );
    }
    insight
}

pub fn custom_message<R: Rng + ?Sized>(
    tone: Tone,
    task_title: Option<&str>,
    time_context: Option<TimeContext>,
    rng: &mut R,
) -> String {
    let mut message = pick(tone.messages(), rng).to_string();
    if let Some(title) = task_title.filter(|t| !t.is_empty()) {
        message.push_str(&format!(
            "\n\n🎯 Focus on: '{}' - like a pearl in an oyster, this task holds value!",
            title
        ));
    }
    if let Some(time) = time_context {
        message.push_str("\n\n");
        message.push_str(time.addition());
    }
    message
}
