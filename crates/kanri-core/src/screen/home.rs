use crate::effect::Effect;
use crate::screen::Action;

/// Landing page showing the server greeting.
#[derive(Debug, Default)]
pub struct Home {
    pub greeting: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Load,
    Loaded(Result<String, String>),
}

impl Home {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, msg: Message) -> Action {
        match msg {
            Message::Load => Action::Run(Effect::Hello),
            Message::Loaded(Ok(greeting)) => {
                self.greeting = Some(greeting);
                self.error = None;
                Action::None
            }
            Message::Loaded(Err(e)) => {
                self.error = Some(e.clone());
                Action::error(format!("Server unreachable: {e}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greeting_clears_previous_error() {
        let mut home = Home::new();
        assert_eq!(home.update(Message::Load), Action::Run(Effect::Hello));
        home.update(Message::Loaded(Err("connection refused".into())));
        assert!(home.error.is_some());
        home.update(Message::Loaded(Ok("hello".into())));
        assert_eq!(home.greeting.as_deref(), Some("hello"));
        assert!(home.error.is_none());
    }
}
