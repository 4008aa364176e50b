use crate::target::TargetActivity;

pub const NAME_PROPERTY: &str = "Name";
pub const TITLE_PROPERTY: &str = "Title";
pub const DESCRIPTION_PROPERTY: &str = "Description";

pub fn needs_backfill(activity: &TargetActivity) -> bool {
    activity.name.is_none() || activity.display_name.is_none() || activity.description.is_none()
}

/// Rebuilds `name`, `display_name` and `description` from the activity's
/// `Name`, `Title` and `Description` properties whenever any of the three is
/// missing.
///
/// Name and display name fall back to the activity type. Description is only
/// replaced when a `Description` property exists.
pub fn backfill_metadata(mut activity: TargetActivity) -> TargetActivity {
    if !needs_backfill(&activity) {
        return activity;
    }

    activity.name = Some(
        property_text(&activity, NAME_PROPERTY).unwrap_or_else(|| activity.activity_type.clone()),
    );
    activity.display_name = Some(
        property_text(&activity, TITLE_PROPERTY).unwrap_or_else(|| activity.activity_type.clone()),
    );
    if let Some(description) = property_text(&activity, DESCRIPTION_PROPERTY) {
        activity.description = Some(description);
    }

    activity
}

fn property_text(activity: &TargetActivity, property: &str) -> Option<String> {
    activity
        .property(property)
        .and_then(|p| p.first_expression())
        .map(str::to_string)
}
