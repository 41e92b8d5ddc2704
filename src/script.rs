pub struct Scripts {
    pub short: String,
    pub long: String,
}

/// Expand a topic into the two narration scripts. Pure templating, same
/// output for the same topic every time.
pub fn build_scripts(topic: &str) -> Scripts {
    let short = format!(
        "Here is something wild about {topic}. Most people have never heard this, \
         and once you do, you will not forget it. Stick around for the full story!"
    );
    let long = format!(
        "Today we are talking about {topic}. It sounds simple, but the closer you \
         look, the stranger it gets. Scientists and historians have puzzled over \
         {topic} for years, and the real answer is better than any myth. \
         Let us break it down piece by piece. By the end, you will see {topic} \
         in a completely new light. If you enjoyed this, subscribe for more!"
    );
    Scripts { short, long }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_scripts_mention_the_topic() {
        let s = build_scripts("why cats purr");
        assert!(s.short.contains("why cats purr"));
        assert!(s.long.contains("why cats purr"));
    }

    #[test]
    fn templating_is_deterministic() {
        let a = build_scripts("honey");
        let b = build_scripts("honey");
        assert_eq!(a.short, b.short);
        assert_eq!(a.long, b.long);
    }

    #[test]
    fn long_script_is_longer() {
        let s = build_scripts("the loudest sound ever recorded");
        assert!(s.long.len() > s.short.len());
    }
}
