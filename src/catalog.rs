//! Built-in student categories and sample content.
//!
//! The category descriptors drive the dashboard UI; the sample Q&A pairs are
//! inserted by the `--seed` flag so a fresh install has something to browse.

use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::store::Store;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryDescriptor {
    pub key: String,
    pub name: String,
    pub icon: String,
    pub description: String,
}

struct StudentCategory {
    key: &'static str,
    display_name: &'static str,
    icon: &'static str,
    description: &'static str,
    samples: &'static [SampleQa],
}

struct SampleQa {
    question: &'static str,
    answer: &'static str,
    tags: &'static [&'static str],
}

const STUDENT_CATEGORIES: &[StudentCategory] = &[
    StudentCategory {
        key: "mathematics",
        display_name: "Mathematics",
        icon: "fas fa-calculator",
        description: "Math concepts, formulas, and problem solving",
        samples: &[
            SampleQa {
                question: "What is the Pythagorean theorem?",
                answer: "The Pythagorean theorem states that in a right triangle, the square of the hypotenuse equals the sum of squares of the other two sides: a² + b² = c²",
                tags: &["geometry", "theorem", "triangle", "math"],
            },
            SampleQa {
                question: "How do you calculate the area of a circle?",
                answer: "The area of a circle is calculated using the formula A = πr², where r is the radius of the circle.",
                tags: &["geometry", "circle", "area", "formula"],
            },
            SampleQa {
                question: "What is the quadratic formula?",
                answer: "The quadratic formula is x = (-b ± √(b²-4ac)) / 2a, used to find the roots of quadratic equations in the form ax² + bx + c = 0",
                tags: &["algebra", "quadratic", "formula", "equations"],
            },
        ],
    },
    StudentCategory {
        key: "science",
        display_name: "Science",
        icon: "fas fa-microscope",
        description: "Physics, Chemistry, Biology concepts",
        samples: &[
            SampleQa {
                question: "What is Newton's first law of motion?",
                answer: "Newton's first law states that an object at rest stays at rest, and an object in motion stays in motion at constant velocity, unless acted upon by an external force.",
                tags: &["physics", "newton", "motion", "force"],
            },
            SampleQa {
                question: "What is photosynthesis?",
                answer: "Photosynthesis is the process by which plants use sunlight, carbon dioxide, and water to produce glucose and oxygen. The equation is: 6CO₂ + 6H₂O + light energy → C₆H₁₂O₆ + 6O₂",
                tags: &["biology", "plants", "photosynthesis", "energy"],
            },
            SampleQa {
                question: "What is the periodic table?",
                answer: "The periodic table is a systematic arrangement of chemical elements organized by atomic number, showing recurring patterns in their properties.",
                tags: &["chemistry", "elements", "periodic-table", "atomic"],
            },
        ],
    },
    StudentCategory {
        key: "history",
        display_name: "History",
        icon: "fas fa-book",
        description: "Historical events, dates, and civilizations",
        samples: &[
            SampleQa {
                question: "When did World War II end?",
                answer: "World War II ended on September 2, 1945, when Japan formally surrendered aboard the USS Missouri in Tokyo Bay.",
                tags: &["wwii", "1945", "japan", "surrender"],
            },
            SampleQa {
                question: "Who was the first president of the United States?",
                answer: "George Washington was the first president of the United States, serving from 1789 to 1797.",
                tags: &["usa", "president", "washington", "founding-fathers"],
            },
            SampleQa {
                question: "What was the Renaissance?",
                answer: "The Renaissance was a cultural movement in Europe from the 14th to 17th century, marked by renewed interest in classical learning, art, and humanism.",
                tags: &["renaissance", "europe", "art", "culture"],
            },
        ],
    },
    StudentCategory {
        key: "language",
        display_name: "Language & Literature",
        icon: "fas fa-pen-fancy",
        description: "Grammar, writing, literature, and communication",
        samples: &[
            SampleQa {
                question: "What is a metaphor?",
                answer: "A metaphor is a figure of speech that compares two different things by stating that one thing is another, without using 'like' or 'as'. Example: 'Life is a journey.'",
                tags: &["literature", "figurative-language", "metaphor", "writing"],
            },
            SampleQa {
                question: "What are the parts of speech?",
                answer: "The eight parts of speech are: nouns, pronouns, verbs, adjectives, adverbs, prepositions, conjunctions, and interjections.",
                tags: &["grammar", "parts-of-speech", "english", "language"],
            },
            SampleQa {
                question: "What is the difference between their, there, and they're?",
                answer: "'Their' shows possession, 'there' indicates location or existence, and 'they're' is a contraction of 'they are'.",
                tags: &["grammar", "homophones", "spelling", "usage"],
            },
        ],
    },
    StudentCategory {
        key: "geography",
        display_name: "Geography",
        icon: "fas fa-globe",
        description: "Countries, capitals, landforms, and world knowledge",
        samples: &[
            SampleQa {
                question: "What is the capital of Australia?",
                answer: "The capital of Australia is Canberra, not Sydney or Melbourne as many people think.",
                tags: &["australia", "capital", "canberra", "world-capitals"],
            },
            SampleQa {
                question: "What are the seven continents?",
                answer: "The seven continents are: Asia, Africa, North America, South America, Antarctica, Europe, and Australia (Oceania).",
                tags: &["continents", "geography", "world", "earth"],
            },
            SampleQa {
                question: "What is the longest river in the world?",
                answer: "The Nile River is generally considered the longest river in the world at approximately 4,135 miles (6,650 km) long.",
                tags: &["rivers", "nile", "longest", "geography"],
            },
        ],
    },
    StudentCategory {
        key: "computer-science",
        display_name: "Computer Science",
        icon: "fas fa-laptop-code",
        description: "Programming, algorithms, and computer concepts",
        samples: &[
            SampleQa {
                question: "What is an algorithm?",
                answer: "An algorithm is a step-by-step set of instructions designed to solve a specific problem or complete a task.",
                tags: &["algorithm", "programming", "problem-solving", "cs"],
            },
            SampleQa {
                question: "What is the difference between HTML and CSS?",
                answer: "HTML (HyperText Markup Language) structures web content, while CSS (Cascading Style Sheets) controls the visual styling and layout of that content.",
                tags: &["html", "css", "web-development", "programming"],
            },
            SampleQa {
                question: "What is a variable in programming?",
                answer: "A variable is a named storage location in computer memory that holds a value that can be referenced and manipulated in a program.",
                tags: &["variables", "programming", "memory", "coding"],
            },
        ],
    },
    StudentCategory {
        key: "study-tips",
        display_name: "Study Tips & Skills",
        icon: "fas fa-graduation-cap",
        description: "Learning strategies, exam prep, and academic success",
        samples: &[
            SampleQa {
                question: "What is the Pomodoro Technique?",
                answer: "The Pomodoro Technique is a time management method where you work for 25 minutes, then take a 5-minute break. After 4 cycles, take a longer 15-30 minute break.",
                tags: &["study-tips", "time-management", "pomodoro", "productivity"],
            },
            SampleQa {
                question: "How can I improve my note-taking?",
                answer: "Use methods like Cornell notes, mind maps, or the outline method. Write key points, use abbreviations, review regularly, and organize by topics or dates.",
                tags: &["note-taking", "study-skills", "organization", "learning"],
            },
            SampleQa {
                question: "What are good test-taking strategies?",
                answer: "Read questions carefully, answer easy questions first, manage your time, eliminate wrong answers in multiple choice, and review your answers before submitting.",
                tags: &["test-taking", "exams", "strategy", "academic-success"],
            },
        ],
    },
    StudentCategory {
        key: "general",
        display_name: "General Knowledge",
        icon: "fas fa-lightbulb",
        description: "Miscellaneous facts and general information",
        samples: &[
            SampleQa {
                question: "How many bones are in the human body?",
                answer: "An adult human body has 206 bones. Babies are born with about 270 bones, but many fuse together as they grow.",
                tags: &["human-body", "anatomy", "bones", "biology"],
            },
            SampleQa {
                question: "What is the speed of light?",
                answer: "The speed of light in a vacuum is approximately 299,792,458 meters per second (about 186,282 miles per second).",
                tags: &["physics", "light", "speed", "constants"],
            },
            SampleQa {
                question: "How many days are in a leap year?",
                answer: "A leap year has 366 days instead of the usual 365. Leap years occur every 4 years, with some exceptions for century years.",
                tags: &["calendar", "leap-year", "time", "mathematics"],
            },
        ],
    },
];

/// Category descriptors for the dashboard UI.
pub fn student_categories() -> Vec<CategoryDescriptor> {
    STUDENT_CATEGORIES
        .iter()
        .map(|c| CategoryDescriptor {
            key: c.key.to_string(),
            name: c.display_name.to_string(),
            icon: c.icon.to_string(),
            description: c.description.to_string(),
        })
        .collect()
}

/// Insert the sample Q&A pairs into the store. Returns the number added.
pub fn seed_samples(store: &Store) -> AppResult<usize> {
    let mut added = 0;
    for category in STUDENT_CATEGORIES {
        for sample in category.samples {
            store.add_qa(
                sample.question,
                sample.answer,
                category.key,
                sample.tags.iter().map(|t| t.to_string()).collect(),
            )?;
            added += 1;
        }
    }
    Ok(added)
}
