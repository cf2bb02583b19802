//! The curated list of daily jokes.

use rand::seq::SliceRandom;
use rand::Rng;

/// Jokes and quips posted to subscribed channels.
pub const JOKES: &[&str] = &[
    "I told my computer I needed a break, and now it won't stop sending me vacation ads.",
    "Why do programmers prefer dark mode? Because light attracts bugs.",
    "There are 10 kinds of people in the world: those who understand binary and those who don't.",
    "I would tell you a UDP joke, but you might not get it.",
    "Debugging: being the detective in a crime movie where you are also the murderer.",
    "A SQL query walks into a bar, walks up to two tables and asks: 'Can I join you?'",
    "Fun fact: honey never spoils. Archaeologists have eaten 3000-year-old honey. Your leftovers are not honey.",
    "Fun fact: octopuses have three hearts. Still not enough to love Monday mornings.",
    "Why did the developer go broke? Because they used up all their cache.",
    "I'm reading a book about anti-gravity. It's impossible to put down.",
    "Fun fact: a group of flamingos is called a flamboyance. Accurate.",
    "Parallel lines have so much in common. It's a shame they'll never meet.",
    "Why don't skeletons fight each other? They don't have the guts.",
    "Fun fact: bananas are berries, but strawberries aren't. Botany has trust issues.",
    "I asked the cloud for more storage. It said it would think about it and rained on me.",
    "It works on my machine. Then we'll ship your machine.",
    "Fun fact: the Eiffel Tower can be 15 cm taller in summer. Heat makes everyone expand.",
    "Why was the JavaScript developer sad? Because they didn't Node how to Express themselves.",
    "I have a joke about procrastination, but I'll tell you tomorrow.",
    "Fun fact: wombat poop is cube-shaped. Nature's own packaging optimisation.",
];

/// Pick one joke uniformly at random.
pub fn random_joke<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    JOKES.choose(rng).copied().unwrap_or("I forgot the punchline. That's the joke.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_random_joke_comes_from_list() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..20 {
            assert!(JOKES.contains(&random_joke(&mut rng)));
        }
    }

    #[test]
    fn test_jokes_fit_in_one_message() {
        assert!(JOKES.iter().all(|joke| !joke.is_empty() && joke.len() < 2000));
    }
}
