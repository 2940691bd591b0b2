//! Greeting text per configured language.

/// Languages the service can greet in. Anything else falls back to English.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Greeting {
    English,
    French,
    Portuguese,
    Spanish,
}

impl Greeting {
    pub fn for_language(language: &str) -> Self {
        match language {
            "french" => Greeting::French,
            "portuguese" => Greeting::Portuguese,
            "spanish" => Greeting::Spanish,
            _ => Greeting::English,
        }
    }

    pub fn text(self) -> &'static str {
        match self {
            Greeting::English => "Hello World",
            Greeting::French => "Bonjour Monde",
            Greeting::Portuguese => "Olá Mundo",
            Greeting::Spanish => "Hola Mundo",
        }
    }
}
