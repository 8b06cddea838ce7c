//! Demo catalog seeding
//!
//! Rebuilds the course catalog, landing-page languages, and quiz banks from
//! built-in sample data. Reseeding is destructive for catalog tables;
//! accounts and the recorded emotion stream survive.

use crate::error::Result;
use crate::storage::libsql::LibsqlStore;
use crate::types::{CourseDescription, CourseModule, Difficulty, ProgrammingLanguage};
use std::collections::{BTreeMap, HashMap};
use tracing::info;

/// A catalog course before persistence assigns an id
struct SampleCourse {
    title: &'static str,
    language: &'static str,
    difficulty: Difficulty,
    prerequisites: Option<&'static str>,
    description: CourseDescription,
}

/// A quiz question keyed by course title
struct SampleQuestion {
    course_title: &'static str,
    level: Difficulty,
    question: &'static str,
    options: [&'static str; 4],
    correct_answer: u32,
    explanation: &'static str,
}

fn module(title: &str, topics: &[&str], exercises: u32) -> CourseModule {
    CourseModule {
        title: title.to_string(),
        topics: topics.iter().map(|t| t.to_string()).collect(),
        exercises,
    }
}

fn resources(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Landing-page language tiles
pub fn sample_languages() -> Vec<ProgrammingLanguage> {
    [
        (
            "Python",
            "A versatile, high-level programming language",
            "fab fa-python",
        ),
        ("JavaScript", "The language of the web", "fab fa-js-square"),
        ("PHP", "Server-side scripting language", "fab fa-php"),
        ("SQL", "Database query language", "fas fa-database"),
        (
            "React",
            "JavaScript library for building user interfaces",
            "fab fa-react",
        ),
    ]
    .into_iter()
    .map(|(name, description, icon_class)| ProgrammingLanguage {
        name: name.to_string(),
        description: description.to_string(),
        icon_class: icon_class.to_string(),
    })
    .collect()
}

fn sample_courses() -> Vec<SampleCourse> {
    vec![
        SampleCourse {
            title: "Python Fundamentals",
            language: "python",
            difficulty: Difficulty::Beginner,
            prerequisites: None,
            description: CourseDescription {
                overview: "Learn Python programming from scratch with hands-on examples and exercises.".to_string(),
                modules: vec![
                    module(
                        "Python Basics",
                        &[
                            "Introduction to Python",
                            "Variables and Data Types",
                            "Basic Operations",
                            "Input and Output",
                        ],
                        5,
                    ),
                    module(
                        "Control Flow",
                        &[
                            "If Statements",
                            "Loops",
                            "Break and Continue",
                            "Nested Structures",
                        ],
                        8,
                    ),
                    module(
                        "Functions",
                        &[
                            "Defining Functions",
                            "Parameters and Arguments",
                            "Return Values",
                            "Scope and Local Variables",
                        ],
                        6,
                    ),
                ],
                resources: resources(&[
                    ("documentation", "https://docs.python.org/3/"),
                    ("practice", "https://python.org/practice"),
                ]),
            },
        },
        SampleCourse {
            title: "JavaScript Essentials",
            language: "javascript",
            difficulty: Difficulty::Beginner,
            prerequisites: None,
            description: CourseDescription {
                overview: "Master JavaScript fundamentals for web development.".to_string(),
                modules: vec![
                    module(
                        "JavaScript Basics",
                        &[
                            "Introduction to JavaScript",
                            "Variables and Constants",
                            "Data Types",
                            "Operators",
                        ],
                        4,
                    ),
                    module(
                        "DOM Manipulation",
                        &[
                            "Selecting Elements",
                            "Modifying Content",
                            "Event Handling",
                            "Dynamic Styling",
                        ],
                        7,
                    ),
                ],
                resources: resources(&[
                    (
                        "documentation",
                        "https://developer.mozilla.org/en-US/docs/Web/JavaScript",
                    ),
                    ("practice", "https://javascript.info"),
                ]),
            },
        },
        SampleCourse {
            title: "Web Development with PHP",
            language: "php",
            difficulty: Difficulty::Intermediate,
            prerequisites: Some("Basic HTML knowledge"),
            description: CourseDescription {
                overview: "Build dynamic web applications with PHP.".to_string(),
                modules: vec![
                    module(
                        "PHP Fundamentals",
                        &[
                            "PHP Syntax",
                            "Variables and Arrays",
                            "Control Structures",
                            "Functions",
                        ],
                        6,
                    ),
                    module(
                        "Web Development",
                        &[
                            "Forms and User Input",
                            "Sessions and Cookies",
                            "File Handling",
                            "Database Integration",
                        ],
                        8,
                    ),
                ],
                resources: resources(&[
                    ("documentation", "https://www.php.net/docs.php"),
                    ("practice", "https://www.w3schools.com/php/"),
                ]),
            },
        },
        SampleCourse {
            title: "Data Structures & Algorithms",
            language: "python",
            difficulty: Difficulty::Intermediate,
            prerequisites: Some("Basic Python knowledge"),
            description: CourseDescription {
                overview: "Master fundamental data structures and algorithms for efficient programming.".to_string(),
                modules: vec![
                    module(
                        "Basic Data Structures",
                        &[
                            "Arrays and Lists",
                            "Stacks and Queues",
                            "Linked Lists",
                            "Hash Tables",
                        ],
                        8,
                    ),
                    module(
                        "Trees and Graphs",
                        &[
                            "Binary Trees",
                            "Binary Search Trees",
                            "Graph Representation",
                            "Graph Traversal",
                        ],
                        10,
                    ),
                    module(
                        "Sorting and Searching",
                        &["Bubble Sort", "Quick Sort", "Merge Sort", "Binary Search"],
                        6,
                    ),
                    module(
                        "Advanced Algorithms",
                        &[
                            "Dynamic Programming",
                            "Greedy Algorithms",
                            "Backtracking",
                            "Complexity Analysis",
                        ],
                        12,
                    ),
                ],
                resources: resources(&[
                    (
                        "documentation",
                        "https://docs.python.org/3/tutorial/datastructures.html",
                    ),
                    ("practice", "https://leetcode.com/"),
                    ("visualization", "https://visualgo.net/"),
                ]),
            },
        },
    ]
}

fn sample_questions() -> Vec<SampleQuestion> {
    vec![
        SampleQuestion {
            course_title: "Python Fundamentals",
            level: Difficulty::Beginner,
            question: "Which keyword defines a function in Python?",
            options: ["func", "def", "function", "lambda"],
            correct_answer: 1,
            explanation: "Functions are introduced with the def keyword.",
        },
        SampleQuestion {
            course_title: "Python Fundamentals",
            level: Difficulty::Beginner,
            question: "What is the index of the first element in a Python list?",
            options: ["-1", "0", "1", "It depends on the list"],
            correct_answer: 1,
            explanation: "Python sequences are zero-indexed.",
        },
        SampleQuestion {
            course_title: "Python Fundamentals",
            level: Difficulty::Intermediate,
            question: "What does the break statement do inside a loop?",
            options: [
                "Skips to the next iteration",
                "Exits the loop immediately",
                "Restarts the loop",
                "Raises an exception",
            ],
            correct_answer: 1,
            explanation: "break leaves the innermost enclosing loop; continue skips to the next iteration.",
        },
        SampleQuestion {
            course_title: "JavaScript Essentials",
            level: Difficulty::Beginner,
            question: "Which declaration creates a variable that cannot be reassigned?",
            options: ["var", "let", "const", "static"],
            correct_answer: 2,
            explanation: "const bindings cannot be reassigned after initialization.",
        },
        SampleQuestion {
            course_title: "JavaScript Essentials",
            level: Difficulty::Beginner,
            question: "Which method selects an element by its id?",
            options: [
                "document.querySelectorAll",
                "document.getElementById",
                "document.getElementsByClassName",
                "document.createElement",
            ],
            correct_answer: 1,
            explanation: "getElementById returns the single element with the given id.",
        },
        SampleQuestion {
            course_title: "Web Development with PHP",
            level: Difficulty::Intermediate,
            question: "Which superglobal holds data submitted via an HTML form using POST?",
            options: ["$_GET", "$_POST", "$_SESSION", "$_COOKIE"],
            correct_answer: 1,
            explanation: "$_POST contains form fields sent in the request body.",
        },
        SampleQuestion {
            course_title: "Web Development with PHP",
            level: Difficulty::Intermediate,
            question: "Which function must be called before using $_SESSION?",
            options: [
                "session_begin()",
                "session_start()",
                "start_session()",
                "init_session()",
            ],
            correct_answer: 1,
            explanation: "session_start() resumes or creates the session for the request.",
        },
        SampleQuestion {
            course_title: "Data Structures & Algorithms",
            level: Difficulty::Intermediate,
            question: "Which data structure removes elements in last-in, first-out order?",
            options: ["Queue", "Stack", "Linked list", "Hash table"],
            correct_answer: 1,
            explanation: "Stacks pop the most recently pushed element first.",
        },
        SampleQuestion {
            course_title: "Data Structures & Algorithms",
            level: Difficulty::Intermediate,
            question: "What is the worst-case time complexity of binary search on a sorted array?",
            options: ["O(1)", "O(log n)", "O(n)", "O(n log n)"],
            correct_answer: 1,
            explanation: "Each comparison halves the remaining search range.",
        },
        SampleQuestion {
            course_title: "Data Structures & Algorithms",
            level: Difficulty::Advanced,
            question: "Which technique stores subproblem results to avoid recomputation?",
            options: [
                "Backtracking",
                "Dynamic programming",
                "Greedy selection",
                "Divide and conquer",
            ],
            correct_answer: 1,
            explanation: "Dynamic programming memoizes overlapping subproblems.",
        },
    ]
}

/// Reseed the catalog tables from the built-in sample data
pub async fn seed_catalog(store: &LibsqlStore) -> Result<()> {
    info!("Seeding demo catalog");

    store.clear_catalog().await?;

    let languages = sample_languages();
    for language in &languages {
        store.insert_language(language).await?;
    }

    let courses = sample_courses();
    let mut course_ids = HashMap::new();
    for course in &courses {
        let id = store
            .insert_course(
                course.title,
                course.language,
                course.difficulty,
                course.prerequisites,
                &course.description,
            )
            .await?;
        course_ids.insert(course.title, id);
    }

    let mut question_count = 0usize;
    for q in sample_questions() {
        if let Some(&course_id) = course_ids.get(q.course_title) {
            let options: Vec<String> = q.options.iter().map(|o| o.to_string()).collect();
            store
                .insert_quiz_question(
                    course_id,
                    q.level,
                    q.question,
                    &options,
                    q.correct_answer,
                    q.explanation,
                )
                .await?;
            question_count += 1;
        }
    }

    info!(
        "Seeded {} courses, {} languages, {} quiz questions",
        courses.len(),
        languages.len(),
        question_count
    );
    Ok(())
}
