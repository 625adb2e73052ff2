//! Line-oriented text protocol.

/// Prompt sent after the welcome banner; not newline-terminated.
pub const NAME_PROMPT: &str = "[ENTER YOUR NAME]: ";

/// Command token that starts a rename request.
pub const RENAME_COMMAND: &str = "/rename";

/// One line received from a joined participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientLine<'a> {
    /// Blank or whitespace-only line; ignored.
    Empty,
    /// `/rename <name>`, with the requested name trimmed (possibly empty).
    Rename(&'a str),
    /// Any other line, forwarded verbatim as the chat body.
    Chat(&'a str),
}

impl<'a> ClientLine<'a> {
    pub fn parse(line: &'a str) -> Self {
        if line.trim().is_empty() {
            return ClientLine::Empty;
        }

        if let Some(rest) = line.trim_start().strip_prefix(RENAME_COMMAND)
            && (rest.is_empty() || rest.starts_with(char::is_whitespace))
        {
            return ClientLine::Rename(rest.trim());
        }

        ClientLine::Chat(line)
    }
}

/// Error notices written to a single connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorNotice {
    EmptyName,
    NameInUse,
    ChatFull,
    JoinFailed,
}

impl ErrorNotice {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorNotice::EmptyName => "[ERROR] Name cannot be empty.\n",
            ErrorNotice::NameInUse => "[ERROR] Name already in use.\n",
            ErrorNotice::ChatFull => "[ERROR] Chat is full.\n",
            ErrorNotice::JoinFailed => "[ERROR] Unable to join the chat.\n",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rename_command() {
        // テスト項目: /rename コマンドから新しい名前が取り出される
        // given (前提条件):
        let inputs = [
            ("/rename charlie", "charlie"),
            ("/rename   charlie  ", "charlie"),
            ("  /rename charlie brown", "charlie brown"),
            ("/rename\tcharlie", "charlie"),
        ];

        for (input, expected) in inputs {
            // when (操作):
            let result = ClientLine::parse(input);

            // then (期待する結果):
            assert_eq!(result, ClientLine::Rename(expected), "input: {:?}", input);
        }
    }

    #[test]
    fn test_parse_rename_without_name() {
        // テスト項目: 名前のない /rename は空の名前として扱われる
        // given (前提条件):
        let inputs = ["/rename", "/rename    "];

        for input in inputs {
            // when (操作):
            let result = ClientLine::parse(input);

            // then (期待する結果):
            assert_eq!(result, ClientLine::Rename(""));
        }
    }

    #[test]
    fn test_parse_chat_message() {
        // テスト項目: コマンド形式でない行はそのままチャット本文になる
        // given (前提条件):
        let inputs = ["Hello everyone!", "/renamed bob", "say /rename bob", " padded "];

        for input in inputs {
            // when (操作):
            let result = ClientLine::parse(input);

            // then (期待する結果):
            assert_eq!(result, ClientLine::Chat(input));
        }
    }

    #[test]
    fn test_parse_blank_line_is_empty() {
        // テスト項目: 空行・空白のみの行は無視される
        // given (前提条件):
        let inputs = ["", "   ", "\t"];

        for input in inputs {
            // when (操作):
            let result = ClientLine::parse(input);

            // then (期待する結果):
            assert_eq!(result, ClientLine::Empty);
        }
    }
}
