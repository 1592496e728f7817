//! Explorer tree: node variants, change notifications and the resolver

mod events;
mod node;
mod resolver;

pub use events::{TreeChange, DEFAULT_EVENT_CAPACITY};
pub use node::{
    AccountNode, MemberNode, RecordNode, TeamMembersNode, TreeNode, ZoneNode, LOADING_LABEL,
    TEAM_MEMBERS_LABEL,
};
pub use resolver::{
    TreeResolver, EMPTY_ACCOUNTS_MESSAGE, EMPTY_MEMBERS_MESSAGE, EMPTY_RECORDS_MESSAGE,
    MISSING_CREDENTIALS_MESSAGE,
};
