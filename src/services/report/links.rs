use urlencoding::encode;

/// Drill-down targets rendered in the HTML report.
#[derive(Debug, Clone)]
pub(crate) struct ReportLinks {
    base: String,
}

impl ReportLinks {
    pub(crate) fn new(base: &str) -> Self {
        Self { base: base.trim_end_matches('/').to_string() }
    }

    pub(crate) fn profile(&self, user_id: &str, course_id: &str) -> String {
        let query = serde_urlencoded::to_string([("course", course_id)]).unwrap_or_default();
        format!("{}/users/{}?{query}", self.base, encode(user_id))
    }

    pub(crate) fn attempt(&self, activity_id: &str, user_id: &str, attempt: i32) -> String {
        format!(
            "{}/activities/{}/attempts/{}/{attempt}",
            self.base,
            encode(activity_id),
            encode(user_id)
        )
    }

    pub(crate) fn object(
        &self,
        activity_id: &str,
        user_id: &str,
        attempt: i32,
        object_id: &str,
    ) -> String {
        format!("{}/objects/{}", self.attempt(activity_id, user_id, attempt), encode(object_id))
    }
}
