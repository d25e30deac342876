use std::slice::Iter;

use derive_more::Display;
use log::trace;

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MuscleGroup {
    Legs,
    Chest,
    Back,
    Shoulders,
    Arms,
    Core,
    Other,
}

impl MuscleGroup {
    /// All groups in classification order, `Other` last.
    pub fn iter() -> Iter<'static, MuscleGroup> {
        static MUSCLE_GROUPS: [MuscleGroup; 7] = [
            MuscleGroup::Legs,
            MuscleGroup::Chest,
            MuscleGroup::Back,
            MuscleGroup::Shoulders,
            MuscleGroup::Arms,
            MuscleGroup::Core,
            MuscleGroup::Other,
        ];
        MUSCLE_GROUPS.iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    /// Matches anywhere in the name.
    Substring(&'static str),
    /// Matches only a whole word of the name.
    Word(&'static str),
}

impl Keyword {
    #[must_use]
    pub fn text(self) -> &'static str {
        match self {
            Keyword::Substring(text) | Keyword::Word(text) => text,
        }
    }

    fn matches(self, name: &str) -> bool {
        match self {
            Keyword::Substring(text) => name.contains(text),
            Keyword::Word(text) => name
                .split(|c: char| !c.is_alphanumeric())
                .any(|word| word == text),
        }
    }
}

/// Classification rules in evaluation order. The first group with a matching
/// keyword wins, so the order of the rows is part of the result.
///
/// "lat" and "ab" are whole words, otherwise "lateral" would be classified as
/// back and "cable crossover" as core.
pub const RULES: &[(MuscleGroup, &[Keyword])] = &[
    (
        MuscleGroup::Legs,
        &[
            Keyword::Substring("squat"),
            Keyword::Substring("deadlift"),
            Keyword::Substring("lunge"),
            Keyword::Substring("leg press"),
            Keyword::Substring("leg curl"),
            Keyword::Substring("hip thrust"),
        ],
    ),
    (
        MuscleGroup::Chest,
        &[
            Keyword::Substring("press"),
            Keyword::Substring("fly"),
            Keyword::Substring("chest"),
        ],
    ),
    (
        MuscleGroup::Back,
        &[
            Keyword::Substring("row"),
            Keyword::Substring("pull"),
            Keyword::Word("lat"),
        ],
    ),
    (
        MuscleGroup::Shoulders,
        &[
            Keyword::Substring("shoulder"),
            Keyword::Substring("lateral"),
            Keyword::Substring("overhead"),
        ],
    ),
    (
        MuscleGroup::Arms,
        &[
            Keyword::Substring("curl"),
            Keyword::Substring("tricep"),
            Keyword::Substring("pushdown"),
        ],
    ),
    (
        MuscleGroup::Core,
        &[
            Keyword::Substring("crunch"),
            Keyword::Substring("plank"),
            Keyword::Substring("woodchop"),
            Keyword::Word("ab"),
            Keyword::Word("abs"),
        ],
    ),
];

/// Map a free-text exercise name to a muscle group.
///
/// Matching ignores case. Names without any known keyword are `Other`.
#[must_use]
pub fn classify(exercise_name: &str) -> MuscleGroup {
    let name = exercise_name.to_lowercase();
    let group = RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| k.matches(&name)))
        .map_or(MuscleGroup::Other, |(group, _)| *group);
    trace!("classified {exercise_name:?} as {group}");
    group
}
