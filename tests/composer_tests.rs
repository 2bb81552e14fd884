use birthday_bot::birthday::composer::{
    FALLBACK_MESSAGE, TEST_MODE_BANNER, choose_template, compose_message, fill_placeholders,
    mention, with_test_banner,
};
use birthday_bot::core::templates::TemplateSet;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn recipients(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| (*n).to_string()).collect()
}

#[test]
fn buckets_follow_recipient_count() {
    let templates = TemplateSet::builtin();
    let mut rng = StdRng::seed_from_u64(1);

    assert_eq!(
        compose_message(&templates, &recipients(&["leem"]), &mut rng),
        "Happy birthday, <@leem>! 🎉"
    );
    assert_eq!(
        compose_message(&templates, &recipients(&["leem", "sam"]), &mut rng),
        "Happy birthday, <@leem> and <@sam>! 🎉"
    );
    assert_eq!(
        compose_message(&templates, &recipients(&["a", "b", "c", "d"]), &mut rng),
        "Happy birthday to <@a>, <@b>, and <@c>! 🎉"
    );
}

#[test]
fn empty_bucket_uses_fallback() {
    let templates = TemplateSet {
        double: Vec::new(),
        ..TemplateSet::builtin()
    };
    let mut rng = StdRng::seed_from_u64(1);

    assert_eq!(choose_template(&templates, 2, &mut rng), FALLBACK_MESSAGE);
    assert_eq!(
        compose_message(&templates, &recipients(&["a", "b"]), &mut rng),
        FALLBACK_MESSAGE
    );
}

#[test]
fn unmatched_placeholders_are_left_alone() {
    let filled = fill_placeholders("{user1} & {user2} & {user4}", &recipients(&["a", "b"]));
    assert_eq!(filled, "<@a> & <@b> & {user4}");
}

#[test]
fn user_and_user1_both_mean_the_first_recipient() {
    let filled = fill_placeholders("{user}/{user1}/{user}", &recipients(&["a"]));
    assert_eq!(filled, "<@a>/<@a>/<@a>");
}

#[test]
fn double_digit_placeholders_do_not_collide() {
    let names: Vec<String> = (1..=10).map(|i| format!("u{i}")).collect();
    let filled = fill_placeholders("{user1} {user10}", &names);
    assert_eq!(filled, "<@u1> <@u10>");
}

#[test]
fn picks_are_reproducible_with_a_seed() {
    let templates = TemplateSet {
        single: (0..20).map(|i| format!("template {i} for {{user}}")).collect(),
        ..TemplateSet::builtin()
    };
    let names = recipients(&["leem"]);

    let first = compose_message(&templates, &names, &mut StdRng::seed_from_u64(42));
    let second = compose_message(&templates, &names, &mut StdRng::seed_from_u64(42));
    assert_eq!(first, second);
    assert!(first.ends_with("for <@leem>"));
}

#[test]
fn banner_goes_on_its_own_line() {
    assert_eq!(mention("leem"), "<@leem>");
    assert_eq!(
        with_test_banner("hi"),
        format!("{TEST_MODE_BANNER}\nhi")
    );
}

#[test]
fn filling_twice_changes_nothing() {
    let names = recipients(&["leem", "sam"]);
    for template in [
        "Happy birthday, {user}! 🎉",
        "{user1} and {user2} and {user3}",
        "no placeholders at all",
        "{user2} before {user1}",
    ] {
        let once = fill_placeholders(template, &names);
        assert_eq!(fill_placeholders(&once, &names), once, "{template:?}");
    }
}
