use anyhow::Context;

use crate::errors::{CaseError, Result};
use crate::registry::Registry;
use crate::value::Object;

const SUITS: [&str; 4] = ["hearts", "spades", "clubs", "diamonds"];

#[derive(Debug, Clone, PartialEq)]
struct Card {
    suit: &'static str,
    card: u32,
}

impl From<Card> for Object {
    fn from(card: Card) -> Self {
        Object::new().with("suit", card.suit).with("card", card.card)
    }
}

/// What `pick_card` accepts: a whole hand or a card number.
enum Pick<'a> {
    Hand(&'a [Card]),
    Number(u32),
}

enum Picked {
    Index(usize),
    Card(Card),
}

fn pick_card(pick: Pick<'_>) -> Picked {
    match pick {
        Pick::Hand(hand) => Picked::Index(hand.len() / 2),
        Pick::Number(x) => Picked::Card(Card {
            suit: SUITS[(x / 13) as usize % SUITS.len()],
            card: x % 13,
        }),
    }
}

pub(super) fn register(registry: &mut Registry) -> Result<()> {
    registry.suite("Functions", |s| {
        s.case("named and anonymous functions", |t| {
            fn add(x: i32, y: i32) -> i32 {
                x + y
            }
            let my_add = |x: i32, y: i32| x + y;
            t.assert_same(add(1, 2), 3)?;
            t.assert_same(my_add(3, 4), 7)?;
            Ok(())
        })?;

        s.case("capturing variables", |t| {
            let z = 100;
            let add_to_z = |x: i32, y: i32| x + y + z;
            t.assert_same(add_to_z(1, 2), 103)?;
            Ok(())
        })?;

        s.case("function types", |t| {
            let my_add: fn(i32, i32) -> i32 = |x, y| x + y;
            t.assert_same(my_add(3, 4), 7)?;
            Ok(())
        })?;

        s.case("optional and default parameters", |t| {
            fn build_name(first: &str, last: Option<&str>) -> String {
                match last {
                    Some(last) => format!("{first} {last}"),
                    None => first.to_string(),
                }
            }
            fn build_name_with_default(first: &str, last: Option<&str>) -> String {
                format!("{first} {}", last.unwrap_or("Smith"))
            }

            t.assert_same(build_name("Bob", None), "Bob")?;
            t.assert_same(build_name("Bob", Some("Adams")), "Bob Adams")?;
            t.assert_same(build_name_with_default("Bob", None), "Bob Smith")?;
            t.assert_same(build_name_with_default("Bob", Some("Adams")), "Bob Adams")?;
            Ok(())
        })?;

        s.case("default before a required parameter", |t| {
            fn build_name(first: Option<&str>, last: &str) -> String {
                format!("{} {last}", first.unwrap_or("Will"))
            }
            t.assert_same(build_name(Some("Bob"), "Adams"), "Bob Adams")?;
            t.assert_same(build_name(None, "Adams"), "Will Adams")?;
            Ok(())
        })?;

        s.case("rest parameters", |t| {
            fn build_name(first: &str, rest: &[&str]) -> String {
                std::iter::once(first)
                    .chain(rest.iter().copied())
                    .collect::<Vec<_>>()
                    .join(" ")
            }
            t.assert_same(
                build_name("Joseph", &["Samuel", "Lucas", "MacKinzie"]),
                "Joseph Samuel Lucas MacKinzie",
            )?;
            Ok(())
        })?;

        s.case("closures returned from methods keep their receiver", |t| {
            struct Deck {
                suits: Vec<&'static str>,
            }
            impl Deck {
                fn card_picker(&self) -> impl Fn(u32) -> Card + '_ {
                    move |picked| Card {
                        suit: self.suits[(picked / 13) as usize],
                        card: picked % 13,
                    }
                }
            }

            let deck = Deck {
                suits: SUITS.to_vec(),
            };
            let picker = deck.card_picker();
            let card = picker(27);
            t.assert_match_object(Object::from(card), Object::new().with("suit", "clubs"))?;
            Ok(())
        })?;

        s.case("one function, two input shapes", |t| {
            let hand = [
                Card { suit: "diamonds", card: 2 },
                Card { suit: "spades", card: 10 },
                Card { suit: "hearts", card: 4 },
            ];

            let Picked::Index(index) = pick_card(Pick::Hand(&hand)) else {
                return Err(CaseError::fault("a hand should yield an index"));
            };
            let picked = hand.get(index).cloned().context("index out of range")?;
            t.assert_same(picked.suit, "spades")?;

            match pick_card(Pick::Number(15)) {
                Picked::Card(card) => {
                    t.assert_strict_equal(
                        Object::from(card),
                        Object::new().with("suit", "spades").with("card", 2),
                    )?;
                }
                Picked::Index(_) => return Err(CaseError::fault("a number should yield a card")),
            }
            Ok(())
        })?;

        Ok(())
    })?;
    Ok(())
}
