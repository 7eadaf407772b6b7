//! Mora-level pronunciation diagnostics and rhythm analysis.

pub mod detector;
pub mod dtw;
pub mod exercises;
pub mod feedback;
pub mod kana;
pub mod rhythm;
pub mod sounds;

pub use detector::detect;
pub use exercises::{generate_practice_exercises, PracticeExercise};
pub use feedback::{detect_monotone, detect_rushed_speech, get_suggestions};
pub use rhythm::{analyze, NativeComparison, RhythmAnalysis, SpeedRating};
pub use sounds::{IssueType, ProblematicSound, Severity, SoundType};
