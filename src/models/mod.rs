// src/models/mod.rs

//! Domain models for the simulados client.
//!
//! Wire names follow the server's Portuguese JSON keys; Rust names are
//! English and mapped with `#[serde(rename)]`.

mod config;
mod exam;
mod performance;
mod ranking;
mod record;
mod session;
mod student;
mod subject_times;

// Re-export all public types
pub use config::{ClientConfig, Config, ExportConfig, SessionConfig};
pub use exam::{Company, MockExam, NewCompany, NewMockExam, NewResult, RecentResult};
pub use performance::{DailyPoint, PerformanceSummary};
pub use ranking::{
    Battle, CountEntry, ExamRankingEntry, MemberCount, PercentEntry, Period, Rankings,
    TeamScore, TeamScoreboard, TeamTotals, WeeklyReport, lenient_number,
};
pub use record::{NewRecord, RecentRecord};
pub use session::SessionTimes;
pub use student::{NewStudent, Student, StudentUpdate, TeamAssignment, TeamMember};
pub use subject_times::SubjectTimes;
