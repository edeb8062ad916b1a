/// One identity (User ID) carried by a public key.
///
/// The fields follow the usual `Full Name (Comment) <email@example.com>`
/// convention. Parts that are absent from the User ID are left empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Identity {
    pub name: String,
    pub comment: String,
    pub email: String,
    /// The User ID exactly as it appears on the key.
    pub user_id: String,
}

impl Identity {
    /// Split a raw User ID into name, comment and email.
    ///
    /// The name runs up to the first `(` or `<`. A comment is only read
    /// when `(` comes first and ends at the next `)`. The email is whatever
    /// sits between the following `<` and `>`. An unterminated comment or
    /// email runs to the end of the string.
    pub fn from_user_id(user_id: &str) -> Self {
        let (name, rest) = match user_id.find(['(', '<']) {
            Some(i) => user_id.split_at(i),
            None => (user_id, ""),
        };

        let (comment, rest) = match rest.strip_prefix('(') {
            Some(after) => after.split_once(')').unwrap_or((after, "")),
            None => ("", rest),
        };

        let email = match rest.find('<') {
            Some(i) => {
                let after = &rest[i + 1..];
                after.split_once('>').map_or(after, |(email, _)| email)
            }
            None => "",
        };

        Self {
            name: name.trim().to_string(),
            comment: comment.trim().to_string(),
            email: email.trim().to_string(),
            user_id: user_id.to_string(),
        }
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.user_id)
    }
}
