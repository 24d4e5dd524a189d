/// Landing page: app heading and the way into the exercise form.
pub(super) fn body(app_title: &str) -> String {
    format!(
        "<main class=\"home\">\n\
         <h1>{app_title}</h1>\n\
         <nav><a href=\"/exercises\">Log a new exercise</a></nav>\n\
         </main>\n"
    )
}
