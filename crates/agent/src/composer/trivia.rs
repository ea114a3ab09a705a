//! Campus lore appended to replies now and then.

use campusbuddy_core::record::Category;

const DINING: &[&str] = &[
    "The omelette station is the only reason some people make it to breakfast.",
    "The smoothie bowls at the Lion's Den have a cult following.",
    "The Lair pizza gets mixed reviews, but the garlic knots are beloved.",
    "Breakfast burritos are the classic fuel before an 8am class.",
    "The salad bar is more solid than its reputation suggests.",
];

const HOUSING: &[&str] = &[
    "Legend says nobody uses the second-floor showers in Hannon.",
    "McCarthy and Del Rey have a friendly rivalry that never ends.",
    "Doheny has the best views, and the least reliable elevators.",
    "Palm South is known as the social dorm.",
    "Hannon's fourth floor has the best study lounges.",
];

const ACADEMICS: &[&str] = &[
    "Office hours are the most underused resource on campus.",
    "The film school faculty includes working industry veterans.",
    "Participation points add up faster than people expect.",
    "Registration opens early in the morning, so set an alarm.",
];

const EVENTS: &[&str] = &[
    "Thursday night events usually come with free pizza.",
    "Home basketball games have some of the best energy on campus.",
    "Movie nights on the bluff are underrated.",
    "The Sunday farmers market is a weekend staple.",
    "Career fairs are stressful but worth it.",
];

const LANDMARKS: &[&str] = &[
    "The bluff views are unmatched at sunset.",
    "The library's third floor is the quietest spot on campus.",
    "The chapel bells are louder than you'd think.",
    "There is a meditation garden behind the chapel that few people know about.",
    "The fine arts rooftop has some of the best sunset views around.",
];

const CAMPUS: &[&str] = &[
    "Bluff life hits different.",
    "Parking is everyone's favorite thing to complain about.",
    "The campus wifi has good days and bad days.",
    "The bookstore is pricey; check online first.",
];

/// The lore pool for a category. Never empty.
pub fn pool(category: Category) -> &'static [&'static str] {
    match category {
        Category::Dining => DINING,
        Category::Housing => HOUSING,
        Category::Professor | Category::Course => ACADEMICS,
        Category::Event | Category::Organization => EVENTS,
        Category::Facility => LANDMARKS,
        Category::News => CAMPUS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_category_has_lore() {
        for category in Category::ALL {
            assert!(!pool(category).is_empty(), "{category}");
        }
    }
}
