pub mod aggregator;
pub mod classifier;
pub mod domain;
pub mod polarity;
pub mod ports;
pub mod reply;
pub mod session;
pub mod suggestions;

pub use aggregator::{aggregate, MoodSeries, MoodTrend};
pub use classifier::{analyze, analyze_chat_message};
pub use domain::{
    ClassificationContext, ConversationTurn, Intent, JournalEntry, Mood, MoodObservation,
    MoodSignal, ReplyStyle, Role, SignalSource,
};
pub use polarity::analyze_entry;
pub use ports::{
    ChartRenderingService, DatabaseService, GenerativeTextService, PortError, PortResult,
};
pub use reply::{ReplyStrategy, RemoteOutcome};
pub use session::ChatSession;
