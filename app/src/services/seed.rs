// foodtruck/src/services/seed.rs

//! Sample catalog used by `SEED_DB=true` and by the in-process store.

use chrono::{DateTime, Duration, NaiveTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::{
  BlogPost, BlogStatus, GalleryItem, GalleryKind, Location, MenuCategory, MenuItem, Review, Schedule,
};

pub struct SeedData {
  pub locations: Vec<Location>,
  pub schedules: Vec<Schedule>,
  pub menu: Vec<MenuItem>,
  pub reviews: Vec<Review>,
  pub gallery: Vec<GalleryItem>,
  /// Includes one draft, which never shows publicly.
  pub posts: Vec<BlogPost>,
}

#[allow(clippy::too_many_arguments)]
fn item(
  name: &str,
  description: &str,
  cents: i64,
  category: MenuCategory,
  display_order: i32,
  flags: (bool, bool, bool),
  variation: Option<&str>,
  now: DateTime<Utc>,
) -> MenuItem {
  let (is_vegetarian, is_spicy, is_gluten_free) = flags;
  MenuItem {
    id: Uuid::new_v4(),
    name: name.to_string(),
    description: description.to_string(),
    price: Decimal::new(cents, 2),
    category,
    is_vegetarian,
    is_spicy,
    is_gluten_free,
    display_order,
    image_url: None,
    square_item_id: variation.map(|v| format!("{}_ITEM", v)),
    square_variation_id: variation.map(str::to_string),
    square_stock: None,
    last_synced_at: None,
    created_at: now,
    updated_at: now,
  }
}

fn review(customer_name: &str, rating: i32, comment: &str, at: DateTime<Utc>) -> Review {
  Review {
    id: Uuid::new_v4(),
    customer_name: customer_name.to_string(),
    rating,
    comment: comment.to_string(),
    image_url: None,
    created_at: at,
  }
}

fn photo(title: &str, kind: GalleryKind, location: &str, at: DateTime<Utc>) -> GalleryItem {
  GalleryItem {
    id: Uuid::new_v4(),
    title: title.to_string(),
    image_url: format!("https://images.example.com/gallery/{}.jpg", title.to_lowercase().replace(' ', "-")),
    kind,
    location: location.to_string(),
    created_at: at,
    updated_at: at,
  }
}

fn post(
  title: &str,
  category: &str,
  status: BlogStatus,
  published_at: Option<DateTime<Utc>>,
  created_at: DateTime<Utc>,
) -> BlogPost {
  BlogPost {
    id: Uuid::new_v4(),
    title: title.to_string(),
    excerpt: Some(format!("{}.", title)),
    content: format!("{}. Find the truck on the schedule page and come hungry.", title),
    image_url: None,
    category: category.to_string(),
    author: "The Kitchen".to_string(),
    status,
    published_at,
    created_at,
  }
}

/// Two locations (one per state), a week of lunch schedules, a small menu and some site content.
pub fn sample_data(now: DateTime<Utc>) -> SeedData {
  let rock_hill = Location {
    id: Uuid::new_v4(),
    name: "Rock Hill Downtown".to_string(),
    address: "123 Main St, Rock Hill, SC 29730".to_string(),
    image_url: None,
    latitude: Some(34.9249),
    longitude: Some(-81.0251),
  };
  let charlotte = Location {
    id: Uuid::new_v4(),
    name: "Charlotte South End".to_string(),
    address: "1500 Camden Rd, Charlotte, NC 28203".to_string(),
    image_url: None,
    latitude: Some(35.2131),
    longitude: Some(-80.8585),
  };

  let today = now.date_naive();
  let lunch = (NaiveTime::from_hms_opt(11, 0, 0), NaiveTime::from_hms_opt(14, 0, 0));
  let mut schedules = Vec::new();
  if let (Some(start_time), Some(end_time)) = lunch {
    for offset in 0..7 {
      let location = if offset % 2 == 0 { &rock_hill } else { &charlotte };
      schedules.push(Schedule {
        id: Uuid::new_v4(),
        location_id: location.id,
        date: today + Duration::days(offset),
        start_time,
        end_time,
      });
    }
  }

  let menu = vec![
    item("Jerk Chicken", "Smoked jerk chicken with rice and peas", 1200, MenuCategory::Signatures, 1, (false, true, true), Some("JERK_CHICKEN_REG"), now),
    item("Oxtail Stew", "Slow braised oxtail, butter beans", 1650, MenuCategory::Signatures, 2, (false, false, true), Some("OXTAIL_REG"), now),
    item("Ital Stew", "Coconut vegetable stew", 1100, MenuCategory::Vegetarian, 1, (true, false, true), None, now),
    item("Fried Plantains", "Sweet plantains", 450, MenuCategory::Sides, 1, (true, false, true), Some("PLANTAIN_REG"), now),
    item("Sorrel", "Hibiscus ginger drink", 350, MenuCategory::Drinks, 1, (true, false, true), None, now),
    item("Jerk Combo", "Jerk chicken, plantains and a drink", 1800, MenuCategory::Combos, 1, (false, true, true), None, now),
    item("Rum Cake", "Slice of rum cake", 500, MenuCategory::Dessert, 1, (true, false, false), None, now),
    item("Extra Sauce", "House jerk sauce", 75, MenuCategory::Extras, 1, (true, true, true), None, now),
  ];

  let reviews = vec![
    review("Tasha M.", 5, "Best jerk chicken this side of Kingston.", now - Duration::days(9)),
    review("Devon R.", 4, "Oxtail was rich and tender. Line moved fast.", now - Duration::days(4)),
    review("Priya K.", 5, "The Ital stew is a must for vegetarians.", now - Duration::days(1)),
  ];

  let gallery = vec![
    photo("Jerk chicken plate", GalleryKind::Food, "Rock Hill Downtown", now - Duration::days(20)),
    photo("Oxtail and butter beans", GalleryKind::Food, "Charlotte South End", now - Duration::days(12)),
    photo("Friday night market", GalleryKind::Event, "Charlotte South End", now - Duration::days(6)),
  ];

  let posts = vec![
    post("Our jerk marinade, explained", "Recipes", BlogStatus::Published, Some(now - Duration::days(14)), now - Duration::days(15)),
    post("Summer stops announced", "News", BlogStatus::Published, Some(now - Duration::days(3)), now - Duration::days(3)),
    post("Holiday menu preview", "News", BlogStatus::Draft, None, now - Duration::days(1)),
  ];

  SeedData {
    locations: vec![rock_hill, charlotte],
    schedules,
    menu,
    reviews,
    gallery,
    posts,
  }
}
