//! Interactive commands typed at the prompt.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Query(String),
    ToggleCategory(String),
    TogglePricing(String),
    ClickTool(String),
    ShowFilters,
    ShowPersona,
    Help,
    Quit,
    Empty,
}

pub const HELP_TEXT: &str = "\
Type a question to search, or one of:
  /filters          list available categories and pricing tiers
  /cat <name>       toggle a category filter
  /price <name>     toggle a pricing filter
  /tool <name>      expand or collapse a tool from the last answer
  /persona          show the current persona
  /help             show this help
  /quit             exit";

pub fn parse_line(line: &str) -> Result<ReplCommand, String> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(ReplCommand::Empty);
    }

    let Some(command) = trimmed.strip_prefix('/') else {
        return Ok(ReplCommand::Query(line.trim_end_matches(['\r', '\n']).to_string()));
    };

    let (name, argument) = match command.split_once(char::is_whitespace) {
        Some((name, argument)) => (name, argument.trim()),
        None => (command, ""),
    };

    let require_argument = |build: fn(String) -> ReplCommand| {
        if argument.is_empty() {
            Err(format!("/{name} needs a value"))
        } else {
            Ok(build(argument.to_string()))
        }
    };

    match name.to_ascii_lowercase().as_str() {
        "cat" | "category" => require_argument(ReplCommand::ToggleCategory),
        "price" | "pricing" => require_argument(ReplCommand::TogglePricing),
        "tool" => require_argument(ReplCommand::ClickTool),
        "filters" => Ok(ReplCommand::ShowFilters),
        "persona" => Ok(ReplCommand::ShowPersona),
        "help" | "?" => Ok(ReplCommand::Help),
        "quit" | "exit" | "q" => Ok(ReplCommand::Quit),
        other => Err(format!("unknown command /{other}; try /help")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_a_query() {
        assert_eq!(
            parse_line("best tools for podcasts\n"),
            Ok(ReplCommand::Query("best tools for podcasts".into()))
        );
    }

    #[test]
    fn blank_line_is_empty() {
        assert_eq!(parse_line("   "), Ok(ReplCommand::Empty));
    }

    #[test]
    fn filter_commands_keep_multi_word_values() {
        assert_eq!(
            parse_line("/cat Video Editing"),
            Ok(ReplCommand::ToggleCategory("Video Editing".into()))
        );
        assert_eq!(
            parse_line("/PRICE  Free Trial "),
            Ok(ReplCommand::TogglePricing("Free Trial".into()))
        );
    }

    #[test]
    fn value_commands_require_an_argument() {
        let err = parse_line("/tool").expect_err("should fail");
        assert!(err.contains("/tool"));
    }

    #[test]
    fn unknown_command_is_reported() {
        let err = parse_line("/launch").expect_err("should fail");
        assert!(err.contains("unknown command"));
    }

    #[test]
    fn quit_aliases() {
        for line in ["/quit", "/exit", "/q"] {
            assert_eq!(parse_line(line), Ok(ReplCommand::Quit));
        }
    }
}
