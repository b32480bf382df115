//! Submitted form data and the checks run on it before anything is written.

pub const REQUIRED: &str = "This field is required.";
pub const BAD_RATING: &str = "Rating must be from 1-5";
pub const BAD_SUBSCRIBED: &str = "Please enter 'yes' or 'no.'";
pub const BAD_AGE: &str = "Age must be a number from 5-100";
pub const BAD_USERNAME: &str = "Username must be a single word";

const RATINGS: [&str; 5] = ["1", "2", "3", "4", "5"];

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Every problem found in one submission, in field order.
#[derive(Debug, Default, Serialize, PartialEq)]
pub struct FormErrors {
    pub errors: Vec<FieldError>,
}

impl FormErrors {
    fn add<S: Into<String>>(&mut self, field: &'static str, message: S) {
        self.errors.push(FieldError { field, message: message.into() });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    fn present<'a>(&mut self, field: &'static str, value: &'a str) -> Option<&'a str> {
        if value.trim().is_empty() {
            self.add(field, REQUIRED);
            None
        } else {
            Some(value)
        }
    }

    /// Presence and length. Returns the value only when both hold.
    fn required<'a>(&mut self, field: &'static str, value: &'a str, max: usize) -> Option<&'a str> {
        let value = self.present(field, value)?;
        if value.chars().count() > max {
            self.add(field, format!("Field cannot be longer than {} characters.", max));
            None
        } else {
            Some(value)
        }
    }

    fn into_result<T>(self, value: Option<T>) -> Result<T, FormErrors> {
        match value {
            Some(v) if self.is_empty() => Ok(v),
            _ => Err(self),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Subscribed {
    Yes,
    No,
}

impl Subscribed {
    pub fn parse(s: &str) -> Option<Subscribed> {
        match s {
            "yes" => Some(Subscribed::Yes),
            "no" => Some(Subscribed::No),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Subscribed::Yes => "yes",
            Subscribed::No => "no",
        }
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NameForm {
    pub name: String,
}

impl NameForm {
    pub fn validate(&self) -> Result<&str, FormErrors> {
        let mut errs = FormErrors::default();
        let name = errs.required("name", &self.name, 64);
        errs.into_result(name)
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelForm {
    pub username: String,
    pub age: String,
    pub channel: String,
    pub rating: String,
    pub subscriber: String,
}

/// A channel submission that passed every check.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidChannel {
    pub username: String,
    pub age: i32,
    pub channel: String,
    pub rating: i32,
    pub subscribed: Subscribed,
}

impl ChannelForm {
    pub fn validate(&self) -> Result<ValidChannel, FormErrors> {
        let mut errs = FormErrors::default();

        let username = errs.required("username", &self.username, 64).and_then(|u| {
            if u.contains(char::is_whitespace) {
                errs.add("username", BAD_USERNAME);
                None
            } else {
                Some(u)
            }
        });

        let age = errs.present("age", &self.age).and_then(|a| {
            match a.trim().parse::<i32>() {
                Ok(n) if (5..=100).contains(&n) => Some(n),
                _ => {
                    errs.add("age", BAD_AGE);
                    None
                }
            }
        });

        let channel = errs.required("channel", &self.channel, 250);

        let rating = errs.present("rating", &self.rating).and_then(|r| {
            if RATINGS.contains(&r) {
                r.parse::<i32>().ok()
            } else {
                errs.add("rating", BAD_RATING);
                None
            }
        });

        let subscribed = errs.present("subscriber", &self.subscriber).and_then(|s| {
            let parsed = Subscribed::parse(s);
            if parsed.is_none() {
                errs.add("subscriber", BAD_SUBSCRIBED);
            }
            parsed
        });

        let valid = match (username, age, channel, rating, subscribed) {
            (Some(username), Some(age), Some(channel), Some(rating), Some(subscribed)) => {
                Some(ValidChannel {
                    username: username.to_string(),
                    age,
                    channel: channel.to_string(),
                    rating,
                    subscribed,
                })
            }
            _ => None,
        };
        errs.into_result(valid)
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoForm {
    pub title: String,
}

/// Query string of `/videoresults`. `title` has no default: leaving it out
/// is rejected by the extractor.
#[derive(Debug, Clone, Deserialize)]
pub struct VideoSearchQuery {
    pub title: String,
}

impl VideoSearchQuery {
    pub fn validate(&self) -> Result<&str, FormErrors> {
        let mut errs = FormErrors::default();
        let title = errs.required("title", &self.title, 250);
        errs.into_result(title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    impl FormErrors {
        fn messages_for(&self, field: &str) -> Vec<&str> {
            self.errors.iter()
                .filter(|e| e.field == field)
                .map(|e| e.message.as_str())
                .collect()
        }
    }

    fn channel_form(username: &str, age: &str, channel: &str, rating: &str, subscriber: &str) -> ChannelForm {
        ChannelForm {
            username: username.to_string(),
            age: age.to_string(),
            channel: channel.to_string(),
            rating: rating.to_string(),
            subscriber: subscriber.to_string(),
        }
    }

    #[test]
    fn valid_channel_form() {
        let f = channel_form("bob", "22", "Bar", "5", "yes");
        let v = f.validate().unwrap();
        assert_eq!(v, ValidChannel {
            username: "bob".to_string(),
            age: 22,
            channel: "Bar".to_string(),
            rating: 5,
            subscribed: Subscribed::Yes,
        });
    }

    #[test]
    fn rating_outside_one_to_five_is_rejected() {
        for bad in &["0", "6", "five", "1.0", " 3", "10", "-1"] {
            let f = channel_form("bob", "22", "Bar", bad, "no");
            let errs = f.validate().unwrap_err();
            assert_eq!(errs.messages_for("rating"), vec![BAD_RATING], "rating {:?}", bad);
        }
    }

    #[test]
    fn subscriber_flag_is_case_sensitive() {
        for bad in &["Yes", "NO", "y", "maybe", "yess"] {
            let f = channel_form("bob", "22", "Bar", "3", bad);
            let errs = f.validate().unwrap_err();
            assert_eq!(errs.messages_for("subscriber"), vec![BAD_SUBSCRIBED], "flag {:?}", bad);
        }
    }

    #[test]
    fn every_field_is_required_and_errors_accumulate() {
        let errs = ChannelForm::default().validate().unwrap_err();
        let fields: Vec<&str> = errs.errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["username", "age", "channel", "rating", "subscriber"]);
        assert!(errs.errors.iter().all(|e| e.message == REQUIRED));
    }

    #[test]
    fn whitespace_only_counts_as_missing() {
        let errs = NameForm { name: "   ".to_string() }.validate().unwrap_err();
        assert_eq!(errs.messages_for("name"), vec![REQUIRED]);
    }

    #[test]
    fn age_must_be_between_five_and_one_hundred() {
        for bad in &["4", "101", "abc", "-7"] {
            let errs = channel_form("bob", bad, "Bar", "3", "yes").validate().unwrap_err();
            assert_eq!(errs.messages_for("age"), vec![BAD_AGE], "age {:?}", bad);
        }
        assert!(channel_form("bob", "5", "Bar", "3", "yes").validate().is_ok());
        assert!(channel_form("bob", "100", "Bar", "3", "yes").validate().is_ok());
    }

    #[test]
    fn username_must_be_one_word() {
        let errs = channel_form("bob smith", "30", "Bar", "3", "yes").validate().unwrap_err();
        assert_eq!(errs.messages_for("username"), vec![BAD_USERNAME]);
    }

    #[test]
    fn long_values_are_rejected() {
        let long = "x".repeat(65);
        let errs = NameForm { name: long }.validate().unwrap_err();
        assert_eq!(errs.messages_for("name"), vec!["Field cannot be longer than 64 characters."]);

        let title = "t".repeat(251);
        assert!(VideoSearchQuery { title }.validate().is_err());
    }

    #[test]
    fn names_keep_their_text() {
        let f = NameForm { name: "Ada".to_string() };
        assert_eq!(f.validate().unwrap(), "Ada");
    }
}
