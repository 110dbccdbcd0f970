use rand::Rng;

use crate::chat_api_client::Post;

pub const GREETING: &str = "Welcome to BadgerChat! How can I help you?";
pub const UNFAMILIAR_INTENT: &str = "I am sorry. I am not familiar with this message.";
pub const NO_CHATROOMS: &str = "No chatrooms were found!";
pub const NO_MESSAGES: &str = "Sorry. No messages were found.";
pub const TURN_FAILED: &str = "Sorry, something went wrong on my end. Please try again.";

const HELP_PHRASINGS: [&str; 3] = [
    "Try to get a list of chatrooms or the latest messages; just ask me!",
    "You can either get a list of chatrooms or get the latest messages; just ask me!",
    "I can help you find chatrooms and show you posts in chatrooms. Please let me know what you need!",
];

const CHATROOM_LEAD_INS: [&str; 3] = [
    "You can visit...",
    "Here is the list of chatrooms you can vist...",
    "There are many chatrooms that you can visit...",
];

const UNKNOWN_PHRASINGS: [&str; 3] = [
    "I'm sorry, I don't understand.",
    "I didn't understand. Can you rephrase?",
    "Oh no! I am not sure what you mean.",
];

/// Outcome categories with more than one authored phrasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyCategory {
    Help,
    ChatroomList,
    Unknown,
}

/// How a post is worded when relayed to the user. One variant is chosen per
/// turn and applied to every post in that turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostTemplate {
    Labeled,
    Narrative,
    PosterFirst,
}

impl PostTemplate {
    fn from_index(index: usize) -> Self {
        match index {
            0 => PostTemplate::Labeled,
            1 => PostTemplate::Narrative,
            _ => PostTemplate::PosterFirst,
        }
    }

    pub fn render(&self, post: &Post) -> String {
        match self {
            PostTemplate::Labeled => format!(
                "Title: '{}', Message: '{}', Posted by: '{}', Chatroom: '{}'",
                post.title, post.content, post.poster, post.chatroom
            ),
            PostTemplate::Narrative => format!(
                "'{}' created a post titled '{}' in '{}' saying '{}'",
                post.poster, post.title, post.chatroom, post.content
            ),
            PostTemplate::PosterFirst => format!(
                "Poster: '{}', Chatroom: '{}', Title: '{}', Message: '{}'",
                post.poster, post.chatroom, post.title, post.content
            ),
        }
    }
}

/// Strategy for choosing among phrasing variants.
///
/// The production picker is random; tests inject a fixed one so exact output
/// can be asserted.
pub trait VariantPicker {
    /// Returns an index in `0..variants`.
    fn pick(&mut self, variants: usize) -> usize;
}

pub struct RandomPicker;

impl VariantPicker for RandomPicker {
    fn pick(&mut self, variants: usize) -> usize {
        rand::rng().random_range(0..variants)
    }
}

#[cfg(test)]
pub struct FixedPicker(pub usize);

#[cfg(test)]
impl VariantPicker for FixedPicker {
    fn pick(&mut self, variants: usize) -> usize {
        self.0 % variants
    }
}

/// The assistant's repertoire of pre-authored replies.
pub struct Phrasebook {
    picker: Box<dyn VariantPicker>,
}

impl Phrasebook {
    pub fn new(picker: Box<dyn VariantPicker>) -> Self {
        Self { picker }
    }

    /// One phrasing for `category`, chosen by the configured picker.
    pub fn pick(&mut self, category: ReplyCategory) -> &'static str {
        let variants = match category {
            ReplyCategory::Help => &HELP_PHRASINGS,
            ReplyCategory::ChatroomList => &CHATROOM_LEAD_INS,
            ReplyCategory::Unknown => &UNKNOWN_PHRASINGS,
        };
        variants[self.picker.pick(variants.len())]
    }

    /// The post wording for the current turn.
    pub fn post_template(&mut self) -> PostTemplate {
        PostTemplate::from_index(self.picker.pick(3))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_post() -> Post {
        Post {
            title: "Exam tips".to_string(),
            content: "Start early".to_string(),
            poster: "bucky".to_string(),
            chatroom: "wisc".to_string(),
        }
    }

    #[test]
    fn fixed_picker_selects_the_authored_phrasings() {
        for (index, expected) in HELP_PHRASINGS.iter().enumerate() {
            let mut book = Phrasebook::new(Box::new(FixedPicker(index)));
            assert_eq!(book.pick(ReplyCategory::Help), *expected);
        }
        for (index, expected) in UNKNOWN_PHRASINGS.iter().enumerate() {
            let mut book = Phrasebook::new(Box::new(FixedPicker(index)));
            assert_eq!(book.pick(ReplyCategory::Unknown), *expected);
        }
        let mut book = Phrasebook::new(Box::new(FixedPicker(1)));
        assert_eq!(
            book.pick(ReplyCategory::ChatroomList),
            "Here is the list of chatrooms you can vist..."
        );
    }

    #[test]
    fn labeled_template_orders_title_first() {
        let rendered = PostTemplate::Labeled.render(&sample_post());
        assert_eq!(
            rendered,
            "Title: 'Exam tips', Message: 'Start early', Posted by: 'bucky', Chatroom: 'wisc'"
        );
    }

    #[test]
    fn narrative_template_reads_as_a_sentence() {
        let rendered = PostTemplate::Narrative.render(&sample_post());
        assert_eq!(
            rendered,
            "'bucky' created a post titled 'Exam tips' in 'wisc' saying 'Start early'"
        );
    }

    #[test]
    fn poster_first_template_orders_poster_first() {
        let rendered = PostTemplate::PosterFirst.render(&sample_post());
        assert_eq!(
            rendered,
            "Poster: 'bucky', Chatroom: 'wisc', Title: 'Exam tips', Message: 'Start early'"
        );
    }

    #[test]
    fn post_template_index_maps_to_all_variants() {
        let mut book = Phrasebook::new(Box::new(FixedPicker(0)));
        assert_eq!(book.post_template(), PostTemplate::Labeled);
        let mut book = Phrasebook::new(Box::new(FixedPicker(1)));
        assert_eq!(book.post_template(), PostTemplate::Narrative);
        let mut book = Phrasebook::new(Box::new(FixedPicker(2)));
        assert_eq!(book.post_template(), PostTemplate::PosterFirst);
    }

    #[test]
    fn random_picker_stays_in_bounds() {
        let mut picker = RandomPicker;
        for _ in 0..100 {
            assert!(picker.pick(3) < 3);
        }
    }
}
