pub mod filter;
pub mod grade;
pub mod question;

pub use filter::{ContentFilter, GroupFilter, FILTER_ALL};
pub use grade::{builtin_grades, chapter_id_from_file, ChapterSummary, GradeData, GradeInfo};
pub use question::{
    Chapter, Content, ContentType, Question, QuestionGroup, TableData, UnknownContentType,
};
