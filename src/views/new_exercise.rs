pub(super) fn body() -> String {
    "<main class=\"new-exercise\">\n\
     <h1>New Exercise</h1>\n\
     <nav><a href=\"/\">Back to home</a></nav>\n\
     </main>\n"
        .to_string()
}
