use once_cell::sync::Lazy;
use regex::Regex;

// [registry[:port]/]name[/name...][:tag][@sha256:digest], lowercase path
// components per the docker reference grammar. The reference is checked
// here so it never reaches a process spawn unvetted.
static IMAGE_REF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:[a-z0-9]+(?:[._-][a-z0-9]+)*(?::[0-9]+)?/)?[a-z0-9]+(?:[._-][a-z0-9]+)*(?:/[a-z0-9]+(?:[._-][a-z0-9]+)*)*(?::[A-Za-z0-9_][A-Za-z0-9._-]{0,127})?(?:@sha256:[a-f0-9]{64})?$",
    )
    .unwrap()
});

pub fn is_valid_reference(image: &str) -> bool {
    IMAGE_REF.is_match(image)
}
