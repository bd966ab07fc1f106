use serde::Deserialize;
use std::str::FromStr;

/// Everything a key (or a bar click) can ask the window manager to do.
///
/// Commands are written as short strings in the config file, e.g.
/// `"spawn rofi -show drun"`, `"group 3"`, `"movetonextscreen"`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum Command {
    Exit,
    Reload,
    Close,
    Spawn(String),
    Group(usize),
    MoveToGroup(usize),
    NextLayout,
    ToggleFloat,
    ToggleFullscreen,
    FocusScreen(usize),
    NextScreen,
    PrevScreen,
    FocusNext,
    FocusPrev,
    ShuffleNext,
    ShufflePrev,
    GrowMaster,
    ShrinkMaster,
    ResetMaster,
    MoveToPrevGroup,
    MoveToNextGroup,
    MoveToPrevScreen,
    MoveToNextScreen,
    SwapScreens,
    Scratchpad,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (head, rest) = match s.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (s, ""),
        };

        let index = |rest: &str| -> Result<usize, String> {
            let n: usize = rest
                .parse()
                .map_err(|_| format!("expected a group/screen number, got {:?}", rest))?;
            if n == 0 {
                return Err(String::from("groups and screens are numbered from 1"));
            }
            Ok(n - 1)
        };

        match head {
            "exit" => Ok(Command::Exit),
            "reload" => Ok(Command::Reload),
            "close" => Ok(Command::Close),
            "spawn" if !rest.is_empty() => Ok(Command::Spawn(rest.to_string())),
            "group" => Ok(Command::Group(index(rest)?)),
            "movetogroup" => Ok(Command::MoveToGroup(index(rest)?)),
            "nextlayout" => Ok(Command::NextLayout),
            "togglefloat" => Ok(Command::ToggleFloat),
            "togglefullscreen" => Ok(Command::ToggleFullscreen),
            "screen" => Ok(Command::FocusScreen(index(rest)?)),
            "nextscreen" => Ok(Command::NextScreen),
            "prevscreen" => Ok(Command::PrevScreen),
            "focusnext" => Ok(Command::FocusNext),
            "focusprev" => Ok(Command::FocusPrev),
            "shufflenext" => Ok(Command::ShuffleNext),
            "shuffleprev" => Ok(Command::ShufflePrev),
            "growmaster" => Ok(Command::GrowMaster),
            "shrinkmaster" => Ok(Command::ShrinkMaster),
            "resetmaster" => Ok(Command::ResetMaster),
            "movetoprevgroup" => Ok(Command::MoveToPrevGroup),
            "movetonextgroup" => Ok(Command::MoveToNextGroup),
            "movetoprevscreen" => Ok(Command::MoveToPrevScreen),
            "movetonextscreen" => Ok(Command::MoveToNextScreen),
            "swapscreens" => Ok(Command::SwapScreens),
            "scratchpad" => Ok(Command::Scratchpad),
            _ => Err(format!("unknown command: {}", s)),
        }
    }
}

impl TryFrom<String> for Command {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Command::from_str(&s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_commands() {
        assert_eq!("exit".parse(), Ok(Command::Exit));
        assert_eq!("movetoprevgroup".parse(), Ok(Command::MoveToPrevGroup));
        assert_eq!("swapscreens".parse(), Ok(Command::SwapScreens));
    }

    #[test]
    fn spawn_keeps_its_arguments() {
        assert_eq!(
            "spawn rofi -show drun".parse(),
            Ok(Command::Spawn(String::from("rofi -show drun")))
        );
    }

    #[test]
    fn group_numbers_are_one_based() {
        assert_eq!("group 1".parse(), Ok(Command::Group(0)));
        assert_eq!("movetogroup 10".parse(), Ok(Command::MoveToGroup(9)));
        assert_eq!("screen 3".parse(), Ok(Command::FocusScreen(2)));
        assert!("group 0".parse::<Command>().is_err());
    }

    #[test]
    fn rejects_unknown_and_bare_spawn() {
        assert!("frobnicate".parse::<Command>().is_err());
        assert!("spawn".parse::<Command>().is_err());
        assert!("group x".parse::<Command>().is_err());
    }
}
