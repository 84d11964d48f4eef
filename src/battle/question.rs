//! Question Bank
//!
//! Immutable, ordered quiz items. A bank is loaded once when a battle
//! starts and narrowed by the battle's subject/chapter filters.

use std::fmt;
use serde::{Serialize, Deserialize};

use crate::battle::config::ConfigError;

/// Every item offers exactly this many options.
pub const OPTION_COUNT: usize = 4;

/// Lowest allowed difficulty.
pub const MIN_DIFFICULTY: u8 = 1;

/// Highest allowed difficulty.
pub const MAX_DIFFICULTY: u8 = 3;

/// School subject a question belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subject {
    /// Matematika
    Math,
    /// IPA
    Science,
    /// Bahasa Inggris
    English,
    /// Bahasa Indonesia
    Indonesian,
}

impl Subject {
    /// All subjects in menu order.
    pub const ALL: [Subject; 4] = [
        Subject::Math,
        Subject::Science,
        Subject::English,
        Subject::Indonesian,
    ];

    /// Stable key used by the setup screen.
    pub fn key(&self) -> &'static str {
        match self {
            Subject::Math => "math",
            Subject::Science => "science",
            Subject::English => "english",
            Subject::Indonesian => "indonesian",
        }
    }

    /// Parse a setup-screen key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.key() == key)
    }

    /// Label shown above a question.
    pub fn display_name(&self) -> &'static str {
        match self {
            Subject::Math => "Matematika",
            Subject::Science => "IPA",
            Subject::English => "Bahasa Inggris",
            Subject::Indonesian => "Bahasa Indonesia",
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A single multiple-choice question.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizItem {
    /// Subject.
    pub subject: Subject,
    /// Chapter key within the subject, if the item is filed under one.
    pub chapter: Option<String>,
    /// Question text.
    pub question: String,
    /// Answer options in display order.
    pub options: [String; OPTION_COUNT],
    /// Index of the correct option.
    pub correct: usize,
    /// Difficulty, 1 to 3.
    pub difficulty: u8,
}

impl QuizItem {
    /// Create an item with no chapter.
    pub fn new(
        subject: Subject,
        question: &str,
        options: [&str; OPTION_COUNT],
        correct: usize,
        difficulty: u8,
    ) -> Self {
        Self {
            subject,
            chapter: None,
            question: question.to_string(),
            options: options.map(str::to_string),
            correct,
            difficulty,
        }
    }

    /// File the item under a chapter.
    pub fn in_chapter(mut self, chapter: &str) -> Self {
        self.chapter = Some(chapter.to_string());
        self
    }

    fn check(&self) -> Result<(), String> {
        if self.correct >= OPTION_COUNT {
            return Err(format!("correct option {} out of range", self.correct));
        }
        if !(MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&self.difficulty) {
            return Err(format!("difficulty {} out of range", self.difficulty));
        }
        Ok(())
    }
}

/// Ordered list of quiz items.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionBank {
    items: Vec<QuizItem>,
}

impl QuestionBank {
    /// Build a bank, rejecting malformed items.
    pub fn new(items: Vec<QuizItem>) -> Result<Self, ConfigError> {
        for (index, item) in items.iter().enumerate() {
            item.check()
                .map_err(|reason| ConfigError::InvalidQuestion { index, reason })?;
        }
        Ok(Self { items })
    }

    /// The built-in ten-question bank.
    pub fn standard() -> Self {
        Self {
            items: vec![
                QuizItem::new(Subject::Math, "Berapa hasil dari 15 × 8 + 20?",
                    ["140", "135", "150", "120"], 0, 2),
                QuizItem::new(Subject::Math, "Jika x + 5 = 12, maka nilai x adalah?",
                    ["5", "7", "8", "17"], 1, 1).in_chapter("algebra"),
                QuizItem::new(Subject::Science, "Proses fotosintesis terjadi pada bagian?",
                    ["Akar", "Batang", "Daun", "Bunga"], 2, 1),
                QuizItem::new(Subject::English, "What is the past tense of \"go\"?",
                    ["Goed", "Went", "Gone", "Going"], 1, 2),
                QuizItem::new(Subject::Math, "Luas lingkaran dengan jari-jari 7 cm adalah? (π = 22/7)",
                    ["154 cm²", "144 cm²", "164 cm²", "174 cm²"], 0, 3).in_chapter("geometry"),
                QuizItem::new(Subject::Science, "Planet terdekat dengan matahari adalah?",
                    ["Venus", "Mars", "Merkurius", "Bumi"], 2, 1),
                QuizItem::new(Subject::Math, "√144 = ?",
                    ["10", "11", "12", "13"], 2, 1).in_chapter("algebra"),
                QuizItem::new(Subject::Indonesian, "Kata baku dari \"praktek\" adalah?",
                    ["Praktik", "Praktek", "Praktis", "Praktikan"], 0, 2),
                QuizItem::new(Subject::Science, "H2O adalah rumus kimia dari?",
                    ["Oksigen", "Hidrogen", "Air", "Udara"], 2, 1),
                QuizItem::new(Subject::Math, "25% dari 200 adalah?",
                    ["25", "50", "75", "100"], 1, 2),
            ],
        }
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the bank has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Item at `index`.
    pub fn get(&self, index: usize) -> Option<&QuizItem> {
        self.items.get(index)
    }

    /// All items in order.
    pub fn items(&self) -> &[QuizItem] {
        &self.items
    }

    /// Items matching the filters, order preserved.
    ///
    /// A chapter filter only narrows within the subject filter.
    pub fn filtered(&self, subject: Option<Subject>, chapter: Option<&str>) -> QuestionBank {
        let items = self.items.iter()
            .filter(|item| subject.map_or(true, |s| item.subject == s))
            .filter(|item| chapter.map_or(true, |c| item.chapter.as_deref() == Some(c)))
            .cloned()
            .collect();
        QuestionBank { items }
    }

    /// The first `count` items.
    pub fn truncated(mut self, count: usize) -> QuestionBank {
        self.items.truncate(count);
        self
    }
}
