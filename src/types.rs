use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A message is collapsed behind a "read more" affordance past this many characters.
pub const EXPAND_CHAR_LIMIT: usize = 150;
/// ...or past this many line breaks.
pub const EXPAND_LINE_LIMIT: usize = 4;
/// Shortest address the signup and loop-creation forms accept.
pub const MIN_ADDRESS_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    pub display_name: String,
    /// Creation timestamp (milliseconds since epoch)
    pub create_at: f64,
}

impl Channel {
    pub fn new(id: String, display_name: String, create_at: f64) -> Self {
        Self {
            id,
            display_name,
            create_at,
        }
    }
}

/// Avatar initials for a channel tile: first letter of each word of the display name.
pub fn channel_initials(display_name: &str) -> String {
    display_name
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub user_id: String,
    pub message: String,
    #[serde(default)]
    pub file_ids: Vec<String>,
    /// Creation timestamp (milliseconds since epoch)
    pub create_at: f64,
    /// Empty for normal messages; non-empty marks a system/service notice.
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Raw username from the external service, the fallback when the author
    /// is not in the member list.
    #[serde(default)]
    pub username: String,
}

impl Post {
    pub fn is_system(&self) -> bool {
        !self.kind.is_empty()
    }

    /// Only one image attachment is supported per post; extra ids are ignored.
    pub fn first_file_id(&self) -> Option<&str> {
        self.file_ids.first().map(String::as_str)
    }

    /// A post is a bulky item when it carries an attachment and a
    /// title/description body (see [`split_bulky`]).
    pub fn is_bulky(&self) -> bool {
        !self.file_ids.is_empty() && self.message.contains("\n\n")
    }
}

/// Whether a message body needs the "read more" affordance.
pub fn is_expandable(message: &str) -> bool {
    message.chars().count() > EXPAND_CHAR_LIMIT
        || message.matches('\n').count() > EXPAND_LINE_LIMIT
}

/// Ordered post collection as supplied by the messaging backend: `order`
/// lists post ids newest-first, `posts` maps id to post. Iteration order is
/// the `order` array; map insertion order is irrelevant.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PostList {
    pub order: Vec<String>,
    pub posts: HashMap<String, Post>,
}

impl PostList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&Post> {
        self.posts.get(id)
    }

    /// The id at the oldest end of the feed, reported to the pagination trigger.
    pub fn oldest_id(&self) -> Option<&str> {
        self.order.last().map(String::as_str)
    }

    /// Posts in display order (newest first).
    pub fn iter_ordered(&self) -> impl Iterator<Item = &Post> {
        self.order.iter().filter_map(|id| self.posts.get(id))
    }

    pub fn prepend_newest(&mut self, post: Post) {
        self.order.insert(0, post.id.clone());
        self.posts.insert(post.id.clone(), post);
    }

    /// Older page fetched by the pagination trigger; appended at the old end.
    pub fn append_older(&mut self, posts: Vec<Post>) {
        for post in posts {
            self.order.push(post.id.clone());
            self.posts.insert(post.id.clone(), post);
        }
    }

    pub fn remove(&mut self, id: &str) {
        self.order.retain(|existing| existing != id);
        self.posts.remove(id);
    }

    pub fn set_message(&mut self, id: &str, message: String) {
        if let Some(post) = self.posts.get_mut(id) {
            post.message = message;
        }
    }
}

/// Prefilled form state for editing a bulky item post.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BulkyItem {
    pub post_id: String,
    pub title: String,
    pub message: String,
    pub file_id: String,
}

/// Split a bulky item body on the first double newline into title and description.
pub fn split_bulky(body: &str) -> (String, String) {
    match body.split_once("\n\n") {
        Some((title, message)) => (title.to_string(), message.to_string()),
        None => (body.to_string(), String::new()),
    }
}

/// Inverse of [`split_bulky`] for titles/descriptions free of double newlines.
pub fn join_bulky(title: &str, message: &str) -> String {
    format!("{}\n\n{}", title, message)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserChain {
    pub chain_uid: String,
    #[serde(default)]
    pub is_chain_admin: bool,
    #[serde(default)]
    pub is_chain_warden: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub uid: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub is_root_admin: bool,
    /// Temporarily not participating in any loop.
    #[serde(default)]
    pub is_paused: bool,
    #[serde(default)]
    pub chains: Vec<UserChain>,
}

impl User {
    pub fn is_admin_of(&self, chain_uid: &str) -> bool {
        self.chains
            .iter()
            .any(|uc| uc.chain_uid == chain_uid && uc.is_chain_admin)
    }

    pub fn is_warden_of(&self, chain_uid: &str) -> bool {
        self.chains
            .iter()
            .any(|uc| uc.chain_uid == chain_uid && uc.is_chain_warden)
    }
}

/// A community clothing-exchange loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loop {
    pub uid: String,
    pub name: String,
    /// Number of hosts (admins); deletion is blocked for a sole host.
    #[serde(default)]
    pub total_hosts: i64,
}

/// Profile answered by the external messaging service for unresolved authors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub username: String,
}

/// Contact fields the backend redacts carry this marker.
pub fn is_redacted(value: &str) -> bool {
    value.contains("***")
}

/// Display name for a post author: the matching member's name, else the raw
/// username the external service attached to the post.
pub fn resolve_author(members: &[User], post: &Post) -> String {
    members
        .iter()
        .find(|member| member.uid == post.user_id)
        .map(|member| member.name.clone())
        .unwrap_or_else(|| post.username.clone())
}

/// Loops the user cannot leave yet: they are the only host. Root admins are
/// exempt from the guard.
pub fn sole_host_loops(user: &User, loops: &[Loop]) -> Vec<String> {
    if user.is_root_admin {
        return Vec::new();
    }
    user.chains
        .iter()
        .filter(|uc| uc.is_chain_admin)
        .filter_map(|uc| loops.iter().find(|l| l.uid == uc.chain_uid))
        .filter(|l| l.total_hosts <= 1)
        .map(|l| l.name.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(id: &str, user_id: &str, message: &str, kind: &str) -> Post {
        Post {
            id: id.to_string(),
            user_id: user_id.to_string(),
            message: message.to_string(),
            file_ids: Vec::new(),
            create_at: 0.0,
            kind: kind.to_string(),
            username: "ext-user".to_string(),
        }
    }

    fn member(uid: &str, name: &str) -> User {
        User {
            uid: uid.to_string(),
            name: name.to_string(),
            email: String::new(),
            phone_number: String::new(),
            address: String::new(),
            sizes: Vec::new(),
            is_root_admin: false,
            is_paused: false,
            chains: Vec::new(),
        }
    }

    #[test]
    fn test_channel_initials() {
        assert_eq!(channel_initials("General"), "G");
        assert_eq!(channel_initials("Bulky Items"), "BI");
        assert_eq!(channel_initials("  spaced   out  "), "so");
        assert_eq!(channel_initials(""), "");
    }

    #[test]
    fn test_expandable_thresholds() {
        let short = "a".repeat(150);
        assert!(!is_expandable(&short));
        let long = "a".repeat(151);
        assert!(is_expandable(&long));

        let four_breaks = "a\nb\nc\nd\ne";
        assert!(!is_expandable(four_breaks));
        let five_breaks = "a\nb\nc\nd\ne\nf";
        assert!(is_expandable(five_breaks));
    }

    #[test]
    fn test_bulky_round_trip() {
        let title = "Winter coat";
        let message = "Size M, good condition.\nPick up downtown.";
        let body = join_bulky(title, message);
        let (split_title, split_message) = split_bulky(&body);
        assert_eq!(split_title, title);
        assert_eq!(split_message, message);
        assert_eq!(join_bulky(&split_title, &split_message), body);
    }

    #[test]
    fn test_split_bulky_without_separator() {
        let (title, message) = split_bulky("just a line");
        assert_eq!(title, "just a line");
        assert_eq!(message, "");
    }

    #[test]
    fn test_resolve_author_prefers_member_name() {
        let members = vec![member("u1", "Alma")];
        let p = post("p2", "u1", "Hello there", "");
        assert_eq!(resolve_author(&members, &p), "Alma");
    }

    #[test]
    fn test_resolve_author_falls_back_to_raw_username() {
        let members = vec![member("u1", "Alma")];
        let p = post("p3", "u9", "Hi", "");
        assert_eq!(resolve_author(&members, &p), "ext-user");
    }

    #[test]
    fn test_example_scenario_ordering_and_kinds() {
        let mut list = PostList::new();
        list.posts
            .insert("p1".to_string(), post("p1", "", "Hi\nAdmin note", "system"));
        list.posts
            .insert("p2".to_string(), post("p2", "u1", "Hello there", ""));
        list.order = vec!["p2".to_string(), "p1".to_string()];

        let ordered: Vec<&Post> = list.iter_ordered().collect();
        assert_eq!(ordered.len(), 2);
        assert_eq!(ordered[0].id, "p2");
        assert!(!ordered[0].is_system());
        assert_eq!(ordered[1].id, "p1");
        assert!(ordered[1].is_system());
        assert_eq!(list.oldest_id(), Some("p1"));
    }

    #[test]
    fn test_empty_order_has_no_oldest_id() {
        let list = PostList::new();
        assert_eq!(list.oldest_id(), None);
    }

    #[test]
    fn test_first_file_id_ignores_extras() {
        let mut p = post("p1", "u1", "body", "");
        p.file_ids = vec!["f1".to_string(), "f2".to_string()];
        assert_eq!(p.first_file_id(), Some("f1"));
    }

    #[test]
    fn test_redaction() {
        assert!(is_redacted("***"));
        assert!(is_redacted("j***@example.com"));
        assert!(!is_redacted("jo@example.com"));
    }

    #[test]
    fn test_sole_host_loops() {
        let mut user = member("u1", "Alma");
        user.chains = vec![
            UserChain {
                chain_uid: "c1".to_string(),
                is_chain_admin: true,
                is_chain_warden: false,
            },
            UserChain {
                chain_uid: "c2".to_string(),
                is_chain_admin: true,
                is_chain_warden: false,
            },
            UserChain {
                chain_uid: "c3".to_string(),
                is_chain_admin: false,
                is_chain_warden: false,
            },
        ];
        let loops = vec![
            Loop {
                uid: "c1".to_string(),
                name: "Utrecht East".to_string(),
                total_hosts: 1,
            },
            Loop {
                uid: "c2".to_string(),
                name: "Amsterdam West".to_string(),
                total_hosts: 3,
            },
            Loop {
                uid: "c3".to_string(),
                name: "Den Haag".to_string(),
                total_hosts: 1,
            },
        ];
        assert_eq!(sole_host_loops(&user, &loops), vec!["Utrecht East"]);

        user.is_root_admin = true;
        assert!(sole_host_loops(&user, &loops).is_empty());
    }

    #[test]
    fn test_post_wire_field_names() {
        let p = post("p1", "u1", "body", "system");
        let json = serde_json::to_value(&p).unwrap();
        assert!(json.get("type").is_some());
        assert!(json.get("file_ids").is_some());
        assert!(json.get("create_at").is_some());
        assert!(json.get("kind").is_none());

        let back: Post = serde_json::from_value(json).unwrap();
        assert_eq!(back, p);
    }
}
