//! Parsing of terminal input lines

pub const HELP: &str = "\
Commands:
  /products [category]                 list products (food, toys, aquarium, hygiene, accessories)
  /login <username> <password>         log in
  /register <username> <email> <pass>  create an account
  /logout                              log out and close the chat
  /reconnect                           reconnect the chat
  /status                              show chat status
  /help                                show this help
  /quit                                exit
Anything else is sent as a chat message.";

/// One line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Chat(String),
    Products(Option<String>),
    Login { username: String, password: String },
    Register { username: String, email: String, password: String },
    Logout,
    Reconnect,
    Status,
    Help,
    Quit,
    /// Known command with wrong arguments
    Usage(&'static str),
    Unknown(String),
}

pub fn parse_input(line: &str) -> Input {
    let trimmed = line.trim();
    let Some(command) = trimmed.strip_prefix('/') else {
        return Input::Chat(line.to_string());
    };

    let mut parts = command.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let args: Vec<&str> = parts.collect();

    match (name, args.as_slice()) {
        ("products", []) => Input::Products(None),
        ("products", [category]) => Input::Products(Some(category.to_string())),
        ("products", _) => Input::Usage("/products [category]"),
        ("login", [username, password]) => Input::Login {
            username: username.to_string(),
            password: password.to_string(),
        },
        ("login", _) => Input::Usage("/login <username> <password>"),
        ("register", [username, email, password]) => Input::Register {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        },
        ("register", _) => Input::Usage("/register <username> <email> <password>"),
        ("logout", []) => Input::Logout,
        ("reconnect", []) => Input::Reconnect,
        ("status", []) => Input::Status,
        ("help", _) => Input::Help,
        ("quit" | "exit", []) => Input::Quit,
        _ => Input::Unknown(name.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_chat() {
        assert_eq!(parse_input("hello there"), Input::Chat("hello there".to_string()));
        // Blank lines still go to the gate, which ignores them
        assert_eq!(parse_input("   "), Input::Chat("   ".to_string()));
    }

    #[test]
    fn test_commands() {
        assert_eq!(parse_input("/products"), Input::Products(None));
        assert_eq!(parse_input("/products toys"), Input::Products(Some("toys".to_string())));
        assert_eq!(
            parse_input("/login alice secret"),
            Input::Login {
                username: "alice".to_string(),
                password: "secret".to_string()
            }
        );
        assert_eq!(parse_input(" /reconnect "), Input::Reconnect);
        assert_eq!(parse_input("/quit"), Input::Quit);
    }

    #[test]
    fn test_bad_arguments() {
        assert!(matches!(parse_input("/login alice"), Input::Usage(_)));
        assert!(matches!(parse_input("/register a b"), Input::Usage(_)));
        assert_eq!(parse_input("/dance"), Input::Unknown("dance".to_string()));
    }
}
