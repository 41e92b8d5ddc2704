use rand::seq::SliceRandom;
use tracing::info;

const TOPICS: &[&str] = &[
    "the deepest parts of the ocean",
    "how ancient Rome fed a million people",
    "the strange lives of octopuses",
    "why the sky is dark at night",
    "the shortest war in history",
    "how honey never spoils",
    "the trees that talk underground",
    "why cats purr",
    "the loudest sound ever recorded",
    "how GPS knows where you are",
    "the city that sank into the sea",
    "why we dream",
];

/// Pick one topic at random from the built-in catalog.
pub fn pick_topic() -> String {
    let mut rng = rand::thread_rng();
    let topic = TOPICS
        .choose(&mut rng)
        .expect("topic catalog is non-empty");
    info!("Picked topic: {}", topic);
    topic.to_string()
}
