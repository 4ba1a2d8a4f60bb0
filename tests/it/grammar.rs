mod c_comment;
mod jsdoc;
