mod const_string;
