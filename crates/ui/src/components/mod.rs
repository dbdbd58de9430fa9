pub mod composer;
pub mod footer;
pub mod header;
pub mod prompt_banner;
pub mod transcript;

pub use composer::Composer;
pub use footer::Footer;
pub use header::Header;
pub use prompt_banner::PromptBanner;
pub use transcript::Transcript;
