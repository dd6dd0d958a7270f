//! Inline admin commands — parsed out of inbound messages before any
//! conversation-state logic runs.
//!
//! Command messages always short-circuit conversation dispatch, including
//! malformed ones: a reserved leading token never starts a conversation.

use crate::store::BindingStore;

pub const CONFIGURE_LIST: &str = "configure-list";
pub const CONFIGURE_ASSIGNEE: &str = "configure-assignee";
pub const LIST_MAPPINGS: &str = "list-mappings";
pub const HELP: &str = "help";

/// Minimum length for a task-list id argument.
const MIN_LIST_ID_LEN: usize = 5;
/// Minimum length for an assignee user-id argument.
const MIN_ASSIGNEE_ID_LEN: usize = 4;

const LIST_FORMAT_ERROR: &str = "❌ Invalid command format. Use: `configure-list <listId>` \
                                 with a valid list id (5+ characters).";
const ASSIGNEE_FORMAT_ERROR: &str = "❌ Invalid command format. Use: `configure-assignee <userId>` \
                                     with a valid user id (4+ characters).";
const NO_MAPPINGS: &str = "📝 No channel mappings configured yet. \
                           Use `configure-list <listId>` to configure.";

const HELP_TEXT: &str = "\
**ticketbot commands**
• `configure-list <listId>` — map this channel to a task list
• `configure-assignee <userId>` — set the default assignee for tasks from this channel
• `list-mappings` — show all channel → list mappings
• `help` — show this message

Any other message starts a guided ticket report.";

/// A recognized command, possibly malformed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    ConfigureList(String),
    ConfigureAssignee(String),
    ListMappings,
    Help,
    /// Reserved leading token with bad arguments; carries the format error.
    Malformed(&'static str),
}

/// Parse a message into a command, or `None` if it isn't one.
///
/// Matching is case-sensitive on the leading token, like the original
/// command surface.
pub fn parse(text: &str) -> Option<Command> {
    let mut tokens = text.split_whitespace();
    let head = tokens.next()?;
    let args: Vec<&str> = tokens.collect();

    match head {
        CONFIGURE_LIST => match args.as_slice() {
            [list_id] if list_id.len() >= MIN_LIST_ID_LEN => {
                Some(Command::ConfigureList(list_id.to_string()))
            }
            _ => Some(Command::Malformed(LIST_FORMAT_ERROR)),
        },
        CONFIGURE_ASSIGNEE => match args.as_slice() {
            [user_id] if user_id.len() >= MIN_ASSIGNEE_ID_LEN => {
                Some(Command::ConfigureAssignee(user_id.to_string()))
            }
            _ => Some(Command::Malformed(ASSIGNEE_FORMAT_ERROR)),
        },
        LIST_MAPPINGS if args.is_empty() => Some(Command::ListMappings),
        HELP if args.is_empty() => Some(Command::Help),
        _ => None,
    }
}

/// Execute a command against the binding store and produce the reply text.
pub async fn execute(
    cmd: Command,
    channel_id: &str,
    channel_name: &str,
    bindings: &dyn BindingStore,
) -> String {
    match cmd {
        Command::ConfigureList(list_id) => {
            bindings.set_list(channel_id, &list_id).await;
            format!("✅ Channel **{channel_name}** is now mapped to task list **{list_id}**")
        }
        Command::ConfigureAssignee(user_id) => {
            bindings.set_assignee(channel_id, &user_id).await;
            format!("✅ Channel **{channel_name}** will assign new tasks to **{user_id}**")
        }
        Command::ListMappings => {
            let mapped: Vec<(String, String)> = bindings
                .all()
                .await
                .into_iter()
                .filter_map(|(channel, binding)| binding.list_id.map(|list| (channel, list)))
                .collect();
            if mapped.is_empty() {
                return NO_MAPPINGS.to_string();
            }
            let mut reply = String::from("📝 **Current channel mappings:**\n");
            for (channel, list_id) in mapped {
                reply.push_str(&format!("• **{channel}**: `{list_id}`\n"));
            }
            reply
        }
        Command::Help => HELP_TEXT.to_string(),
        Command::Malformed(error) => error.to_string(),
    }
}
