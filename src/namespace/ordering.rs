use std::cmp::Ordering;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::filesystem::FilesystemNode;

/// Display order of a listing: folders before files, then names in
/// collation order.
pub fn listing_order(
    (a_name, a_node): &(&str, &FilesystemNode),
    (b_name, b_node): &(&str, &FilesystemNode),
) -> Ordering {
    match (a_node.is_folder(), b_node.is_folder()) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => compare_names(a_name, b_name),
    }
}

/// Compares names level by level: base letters, then accents, then case
/// with lowercase first. Exact code-point order keeps the result total.
fn compare_names(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(base_letters(b))
        .then_with(|| folded(a).cmp(folded(b)))
        .then_with(|| lowercase_first(a, b))
        .then_with(|| a.cmp(b))
}

fn base_letters(name: &str) -> impl Iterator<Item = char> + '_ {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
}

fn folded(name: &str) -> impl Iterator<Item = char> + '_ {
    name.nfd().flat_map(char::to_lowercase)
}

fn lowercase_first(a: &str, b: &str) -> Ordering {
    a.nfd()
        .zip(b.nfd())
        .find(|(x, y)| x != y)
        .map_or(Ordering::Equal, |(x, y)| {
            match (x.is_lowercase(), y.is_lowercase()) {
                (true, false) => Ordering::Less,
                (false, true) => Ordering::Greater,
                _ => Ordering::Equal,
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case("apple", "Banana", Ordering::Less)]
    #[case("Banana", "apple", Ordering::Greater)]
    #[case("a", "a", Ordering::Equal)]
    #[case("a", "A", Ordering::Less)]
    #[case("A", "a", Ordering::Greater)]
    #[case("file2", "file10", Ordering::Greater)]
    #[case("Émile", "Zoe", Ordering::Less)]
    #[case("apple", "Émile", Ordering::Less)]
    #[case("resume", "résumé", Ordering::Less)]
    #[case("Eclair", "éclair", Ordering::Less)]
    #[case("éclair", "Éclair", Ordering::Less)]
    fn names_follow_collation_levels(
        #[case] a: &str,
        #[case] b: &str,
        #[case] expected: Ordering,
    ) {
        assert_eq!(compare_names(a, b), expected);
    }

    #[test]
    fn accented_names_sort_among_their_base_letters() {
        let mut names = vec!["Zoe", "Émile", "apple", "eve"];
        names.sort_by(|a, b| compare_names(a, b));
        assert_eq!(names, vec!["apple", "Émile", "eve", "Zoe"]);
    }

    #[test]
    fn folders_sort_before_files() {
        let folder = FilesystemNode::empty_folder();
        let file = FilesystemNode::file();
        assert_eq!(
            listing_order(&("zzz", &folder), &("aaa", &file)),
            Ordering::Less
        );
        assert_eq!(
            listing_order(&("aaa", &file), &("zzz", &folder)),
            Ordering::Greater
        );
    }
}
