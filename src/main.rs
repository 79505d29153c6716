//! # Deckflow CLI
//!
//! Usage:
//!   deckflow deck.json -o slides.json
//!   cat deck.json | deckflow --pretty
//!   deckflow --example > deck.json

use std::env;
use std::fs;
use std::io::{self, Read};
use std::process;

use deckflow::model::Deck;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.iter().any(|a| a == "--example") {
        print!("{}", example_deck_json());
        return;
    }

    let input_path = args
        .iter()
        .skip(1)
        .enumerate()
        .find(|(i, a)| !a.starts_with('-') && args[*i] != "-o")
        .map(|(_, a)| a.clone());
    let output_path = args
        .windows(2)
        .find(|w| w[0] == "-o")
        .map(|w| w[1].clone());
    let pretty = args.iter().any(|a| a == "--pretty");

    let input = match read_input(input_path.as_deref()) {
        Ok(s) => s,
        Err(e) => fail(&format!("Failed to read input: {}", e)),
    };

    let deck: Deck = match serde_json::from_str(&input) {
        Ok(d) => d,
        Err(e) => fail(&deckflow::DeckError::from(e).to_string()),
    };
    let slides = match deckflow::paginate_deck(&deck) {
        Ok(s) => s,
        Err(e) => fail(&e.to_string()),
    };

    let output = serde_json::json!({ "slides": slides });
    let rendered = if pretty {
        serde_json::to_string_pretty(&output)
    } else {
        serde_json::to_string(&output)
    };
    let rendered = match rendered {
        Ok(s) => s,
        Err(e) => fail(&format!("Failed to serialize slides: {}", e)),
    };

    match &output_path {
        Some(path) => {
            if let Err(e) = fs::write(path, &rendered) {
                fail(&format!("Failed to write {}: {}", path, e));
            }
        }
        None => println!("{}", rendered),
    }

    let continuations = slides.iter().filter(|s| s.is_continuation).count();
    let degraded: Vec<&str> = slides
        .iter()
        .filter(|s| s.degraded)
        .map(|s| s.id.as_deref().unwrap_or("<unnamed>"))
        .collect();
    eprintln!(
        "✓ {} input slide(s) → {} slide(s) ({} continuation(s)){}",
        deck.slides.len(),
        slides.len(),
        continuations,
        output_path
            .map(|p| format!(", written to {}", p))
            .unwrap_or_default()
    );
    if !degraded.is_empty() {
        eprintln!("! content still overflows on: {}", degraded.join(", "));
    }
}

fn read_input(path: Option<&str>) -> io::Result<String> {
    match path {
        Some(p) => fs::read_to_string(p),
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn fail(msg: &str) -> ! {
    eprintln!("✗ {}", msg);
    process::exit(1);
}

fn example_deck_json() -> &'static str {
    r##"{
  "config": {
    "canvas": { "width": 720, "height": 405 }
  },
  "slides": [
    {
      "id": "overview",
      "elements": [
        { "type": "text", "role": "title", "text": "Quarterly Review" },
        { "type": "text", "role": "subtitle", "text": "Highlights and open risks" },
        { "type": "text", "role": "footer", "text": "Internal", "directives": { "align": "right" } }
      ],
      "rootSection": {
        "kind": "section",
        "children": [
          {
            "kind": "row",
            "directives": { "gap": 20 },
            "children": [
              {
                "kind": "column",
                "directives": { "width": "2/3" },
                "children": [
                  { "type": "text", "text": "Risks", "headingLevel": 2 },
                  {
                    "type": "list",
                    "items": [
                      { "text": "Supplier lead times doubled in two regions" },
                      { "text": "Hiring plan is behind by six roles" },
                      { "text": "Platform migration slipped one quarter", "children": [
                        { "text": "Data backfill is the critical path" },
                        { "text": "Read replicas ready in week 3" }
                      ] },
                      { "text": "Currency exposure above hedge ceiling" },
                      { "text": "Two enterprise renewals at risk" },
                      { "text": "Security audit findings still open" },
                      { "text": "Support backlog above target for eight weeks" },
                      { "text": "New pricing page underperforms the old one" },
                      { "text": "Partner API deprecation lands mid-quarter" },
                      { "text": "Office move overlaps with release freeze" }
                    ]
                  }
                ]
              },
              {
                "kind": "column",
                "children": [
                  {
                    "type": "image",
                    "url": "https://example.com/team.jpg",
                    "aspectRatio": 0.75,
                    "directives": { "fill": true }
                  }
                ]
              }
            ]
          }
        ]
      }
    },
    {
      "id": "numbers",
      "elements": [
        { "type": "text", "role": "title", "text": "Revenue by region" },
        {
          "type": "table",
          "headers": ["Region", "Q1", "Q2", "Q3"],
          "rows": [
            ["North America", "4.1", "4.4", "4.9"],
            ["Europe", "2.8", "3.0", "3.1"],
            ["Asia Pacific", "1.9", "2.3", "2.6"],
            ["Latin America", "0.7", "0.8", "0.9"]
          ]
        },
        {
          "type": "code",
          "language": "sql",
          "code": "SELECT region, SUM(amount)\nFROM orders\nGROUP BY region;"
        }
      ]
    }
  ]
}
"##
}
