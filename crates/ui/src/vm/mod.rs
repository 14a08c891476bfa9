mod quiz_vm;
mod result_vm;
mod time_fmt;

pub use quiz_vm::{QuizIntent, QuizOutcome, QuizVm};
pub use result_vm::{ResultRowVm, ResultVm, map_report};
pub use time_fmt::format_countdown;
