mod command;
pub use command::{Action, Command};

mod request_log;
pub use request_log::RequestLogEntry;

mod replica;
pub use replica::{ClusterStatus, Replica, ReplicaStatus};

mod service_status;
pub use service_status::ServiceStatus;
