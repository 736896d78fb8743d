//! Profile extraction from `web_profile_info` payloads.

use serde_json::Value;

use super::path::{expect_object, lookup, Field};
use crate::error_handling::ExtractError;
use crate::models::UserProfile;

const ID: Field = Field::new("id", &["id"]);
const USERNAME: Field = Field::new("username", &["username"]);
const FULL_NAME: Field = Field::new("name", &["full_name"]);
const PROFILE_PIC: Field = Field::new("profile_picture_url", &["profile_pic_url_hd"]);
const BIOGRAPHY: Field = Field::new("biography", &["biography"]);
const CATEGORY: Field = Field::new("category", &["category_name"]);
const FOLLOWERS: Field = Field::new("n_followers", &["edge_followed_by", "count"]);
const FOLLOWS: Field = Field::new("n_follows", &["edge_follow", "count"]);
const POSTS: Field = Field::new("n_posts", &["edge_owner_to_timeline_media", "count"]);
const IS_BUSINESS: Field = Field::new("is_business_account", &["is_business_account"]);
const BUSINESS_CATEGORY: Field = Field::new("business_category", &["business_category_name"]);
const IS_PROFESSIONAL: Field = Field::new("is_professional_account", &["is_professional_account"]);
const IS_JOINED_RECENTLY: Field = Field::new("is_joined_recently", &["is_joined_recently"]);
const IS_VERIFIED: Field = Field::new("is_verified", &["is_verified"]);
const IS_PRIVATE: Field = Field::new("is_private", &["is_private"]);
const IS_REGULATED_C18: Field = Field::new("is_regulated_c18", &["is_regulated_c18"]);
const EXTERNAL_URL: Field = Field::new("external_url", &["external_url"]);
const RELATED: Field = Field::new("related_accounts", &["edge_related_profiles"]);
const BIO_LINKS: Field = Field::new("bio_links", &["bio_links"]);
const VIDEO_COUNT: Field = Field::new("video_count", &["edge_felix_video_timeline", "count"]);

/// Extracts a profile from the `data.user` object.
///
/// # Errors
///
/// Fails if the payload is not an object or lacks `id` or `username`.
pub fn extract_profile(raw: &Value) -> Result<UserProfile, ExtractError> {
    expect_object(raw, "user")?;

    let bio_links = BIO_LINKS
        .get(raw)
        .and_then(Value::as_array)
        .map(|links| {
            links
                .iter()
                .filter_map(|link| lookup(link, &["url"]))
                .filter_map(|url| url.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default();

    Ok(UserProfile {
        id: ID.required_str(raw)?,
        username: USERNAME.required_str(raw)?,
        full_name: FULL_NAME.str(raw),
        profile_pic_url: PROFILE_PIC.str(raw),
        biography: BIOGRAPHY.str(raw),
        category: CATEGORY.str(raw),
        follower_count: FOLLOWERS.i64(raw),
        follow_count: FOLLOWS.i64(raw),
        post_count: POSTS.i64(raw),
        is_business_account: IS_BUSINESS.bool(raw),
        business_category: BUSINESS_CATEGORY.str(raw),
        is_professional_account: IS_PROFESSIONAL.bool(raw),
        is_joined_recently: IS_JOINED_RECENTLY.bool(raw),
        is_verified: IS_VERIFIED.bool(raw),
        is_private: IS_PRIVATE.bool(raw),
        is_regulated_c18: IS_REGULATED_C18.bool(raw),
        external_url: EXTERNAL_URL.str(raw),
        related_accounts: RELATED.edge_strings(raw, &["username"]),
        bio_links,
        video_count: VIDEO_COUNT.i64(raw),
    })
}
