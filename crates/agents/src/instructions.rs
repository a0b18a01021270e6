//! System instructions sent ahead of every profile prompt.

use data_loader::Domain;

const MOVIE_INSTRUCTION: &str = "
You will be presented with user ratings and your job is to provide a general
summarization of users preferences. You should pay attention to movie genres, its release year,
main cast, director, awards, critical acclaims, and other relevant information.
The response should be split into several parts: first should provide the analysis of movie
preferences based on its year. The second should be focused on genres and plot twists.
The third one should describe preferences in cast and directors.
The fourth should characterise users choice based on correlation between users ranking and critical
acclamation and reviews of movies. The fifth paragraph should describe the movies with user dislike
based on assigned rating 3 and below. What do these low-ranked movies have in common?
Provided user's profile as a general description of the user's preferences should avoid mentioning
the actual movies and ratings or user personal data. Try to predict favourite users actor, director,
genre, etc. The user profile should be useful for further movie recommendations and it should be at
least 5 paragraphs long. The description should include characteristics of the most relevant genres
to the user. Avoid mentioning specific movies in response.
";

const MUSIC_INSTRUCTION: &str = "
You will be presented with user ratings and your job is to provide a general
summarization of users preferences. You should pay attention to music genres,
its release year, musicians, used instruments, text meaning, awards,
critical acclaims, and other relevant information. The response should be split
into several parts: first should provide the analysis of music album preferences
based on its year. The second should be focused on genres and lyrics.
The third one should describe preferences in musicians and instruments.
The fourth should characterise users choice based on correlation between users
ranking and critical acclamation and reviews of music albums. The fifth paragraph
should describe the albums which user dislikes based on assigned rating 3 and below.
What do these low-ranked albums have in common? Provided user's profile as a general
description of the user's preferences should avoid mentioning the actual albums and
ratings or user personal data. Try to predict favourite users musicians, bands,
genre, etc. The user profile should be useful for further music recommendations and
it should be at least 5 paragraphs long. The description should include
characteristics of the most relevant genres to the user.
Avoid mentioning specific albums in response.
";

/// Instruction for the given domain as a single line of text
pub fn system_instruction(domain: Domain) -> String {
    let raw = match domain {
        Domain::Movie => MOVIE_INSTRUCTION,
        Domain::Music => MUSIC_INSTRUCTION,
    };
    raw.trim().replace('\n', " ")
}
