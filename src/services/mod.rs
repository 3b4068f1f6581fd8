pub mod cache;
pub mod content_renderer;
pub mod debounce;
pub mod fetcher;
pub mod filter;
pub mod math_text;

pub use cache::{CacheEntry, CacheStore, MemoryCache, DEFAULT_CACHE_TTL};
pub use content_renderer::{
    format_text_with_breaks, render_content, CodeBlock, Presentation, DEFAULT_CODE_LANGUAGE,
};
pub use debounce::{DebouncedSearch, DEFAULT_DEBOUNCE};
pub use fetcher::{FetchOptions, Fetcher};
pub use filter::{
    count_questions, filter_questions, question_key, total_questions, unique_content_types,
    unique_question_groups, validate_question, FilterCriteria,
};
pub use math_text::{parse_math_text, MathSegment};
