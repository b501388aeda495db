//! Bundled practice books.
//!
//! A fixed sample set that behaves like live results for the save flow, so
//! the browser is explorable with no backend configured. No network calls.

use crate::catalog::model::{CatalogItem, PRACTICE_ID_PREFIX};

/// The fixed practice dataset.
#[derive(Debug, Clone)]
pub struct PracticeCatalog {
    items: Vec<CatalogItem>,
}

impl Default for PracticeCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl PracticeCatalog {
    pub fn new() -> Self {
        Self {
            items: sample_books(),
        }
    }

    /// All practice items, in display order.
    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&CatalogItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

struct Sample {
    title: &'static str,
    subtitle: &'static str,
    author: &'static str,
    publisher: &'static str,
    published: &'static str,
    description: &'static str,
    volume: Option<&'static str>,
    categories: [&'static str; 3],
    rating: f64,
    count: u32,
}

const SAMPLES: [Sample; 6] = [
    Sample {
        title: "The Power of Now",
        subtitle: "A Guide to Spiritual Enlightenment",
        author: "Eckhart Tolle",
        publisher: "New World Library",
        published: "2004",
        description: "The Power of Now shows you that every minute you spend worrying about the future or regretting the past is a minute lost, because really all you have to live in is the present, the now.",
        volume: Some("iJZYBAAAQBAJ"),
        categories: ["Self-Help", "Spirituality", "Philosophy"],
        rating: 4.2,
        count: 1250,
    },
    Sample {
        title: "Atomic Habits",
        subtitle: "An Easy & Proven Way to Build Good Habits & Break Bad Ones",
        author: "James Clear",
        publisher: "Avery",
        published: "2018",
        description: "No matter your goals, Atomic Habits offers a proven framework for improving every day. It reveals practical strategies for forming good habits, breaking bad ones, and mastering the tiny behaviors that lead to remarkable results.",
        volume: Some("XfFvDwAAQBAJ"),
        categories: ["Self-Help", "Psychology", "Personal Development"],
        rating: 4.6,
        count: 2100,
    },
    Sample {
        title: "Think and Grow Rich",
        subtitle: "The Landmark Bestseller Now Revised and Updated",
        author: "Napoleon Hill",
        publisher: "TarcherPerigee",
        published: "2005",
        description: "Often called the granddaddy of all motivational literature, it was the first book to boldly ask what makes a winner.",
        volume: Some("9kCgCwAAQBAJ"),
        categories: ["Business", "Self-Help", "Success"],
        rating: 4.1,
        count: 890,
    },
    Sample {
        title: "The 7 Habits of Highly Effective People",
        subtitle: "Powerful Lessons in Personal Change",
        author: "Stephen R. Covey",
        publisher: "Free Press",
        published: "2004",
        description: "A principle-centered approach for solving personal and professional problems, built around seven habits of character.",
        volume: Some("Jz1aBAAAQBAJ"),
        categories: ["Self-Help", "Leadership", "Personal Development"],
        rating: 4.3,
        count: 1560,
    },
    Sample {
        title: "Mindset: The New Psychology of Success",
        subtitle: "How We Can Learn to Fulfill Our Potential",
        author: "Carol S. Dweck",
        publisher: "Ballantine Books",
        published: "2007",
        description: "How a growth mindset helps you overcome challenges, embrace learning, and reach your potential in every area of life.",
        volume: None,
        categories: ["Psychology", "Education", "Personal Growth"],
        rating: 4.6,
        count: 1800,
    },
    Sample {
        title: "Grit: The Power of Passion and Perseverance",
        subtitle: "Why Talent Isn't Everything",
        author: "Angela Duckworth",
        publisher: "Scribner",
        published: "2016",
        description: "Why a combination of passion and perseverance, rather than talent, is the secret to outstanding achievement.",
        volume: None,
        categories: ["Psychology", "Motivation", "Success"],
        rating: 4.4,
        count: 1650,
    },
];

fn sample_books() -> Vec<CatalogItem> {
    SAMPLES
        .iter()
        .enumerate()
        .map(|(i, s)| CatalogItem {
            id: format!("{PRACTICE_ID_PREFIX}{}", i + 1),
            title: s.title.to_string(),
            subtitle: Some(s.subtitle.to_string()),
            authors: vec![s.author.to_string()],
            publisher: Some(s.publisher.to_string()),
            published_date: Some(s.published.to_string()),
            description: Some(s.description.to_string()),
            thumbnail: s.volume.map(|v| {
                format!(
                    "https://books.google.com/books/content?id={v}&printsec=frontcover&img=1&zoom=1&source=gbs_api"
                )
            }),
            preview_link: s
                .volume
                .map(|v| format!("https://books.google.com/books?id={v}")),
            categories: s.categories.iter().map(|c| c.to_string()).collect(),
            average_rating: Some(s.rating),
            ratings_count: Some(s.count),
            is_saved: false,
        })
        .collect()
}
