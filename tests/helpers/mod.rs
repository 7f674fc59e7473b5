pub mod builders;
pub mod db;
pub mod fixtures;
pub mod mock_notifier;

pub use builders::ConsentBuilder;
pub use db::TestDb;
pub use fixtures::TestKeypair;
pub use mock_notifier::{MockNotifier, NotifierCall};
